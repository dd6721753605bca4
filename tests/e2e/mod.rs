mod helpers;
mod scenarios;
