//! Built-in policy tables.
//!
//! This file lists blocked license names and restriction phrases as data, so it
//! is itself one of the `SELF_FILES` the selector never hands to the analyzer.

use super::rules::LicenseRule;

pub const ALLOWED_LICENSES: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "BSD-3-Clause",
    "BSD-2-Clause",
    "ISC",
    "Unlicense",
    "MIT License",
    "Apache License 2.0",
    "BSD 3-Clause License",
];

pub const BLOCKED_LICENSE_ALIASES: &[&str] = &[
    "GNU General Public License",
    "GNU Affero General Public License",
    "GNU Lesser General Public License",
    "GPL-2.0",
    "GPL-3.0",
    "AGPL-3.0",
    "LGPL-2.1",
    "LGPL-3.0",
];

pub fn blocked_rules() -> Vec<LicenseRule> {
    vec![
        LicenseRule::blocked(
            "GPL",
            r"\bGPL(?:v?[23])?\b|GNU General Public License",
            true,
            &[
                "This program is free software",
                "under the terms of the GNU General Public License",
                "GPL v2",
                "GPL v3",
                "SPDX-License-Identifier: GPL",
            ],
        ),
        LicenseRule::blocked(
            "AGPL",
            r"\bAGPL(?:v?3)?\b|GNU Affero General Public License",
            true,
            &[
                "under the terms of the GNU Affero General Public License",
                "AGPL v3",
                "SPDX-License-Identifier: AGPL",
            ],
        ),
        LicenseRule::blocked(
            "LGPL",
            r"\bLGPL(?:v?[23](?:\.1)?)?\b|GNU (?:Lesser|Library) General Public License",
            true,
            &[
                "This library is free software",
                "under the terms of the GNU Lesser General Public License",
                "SPDX-License-Identifier: LGPL",
            ],
        ),
        LicenseRule::blocked(
            "MPL-2.0",
            r"\bMPL-2\.0\b|Mozilla Public License,?\s+v(?:ersion)?\.?\s*2\.0",
            true,
            &[
                "This Source Code Form is subject to the terms of the Mozilla Public License",
                "SPDX-License-Identifier: MPL-2.0",
            ],
        ),
        LicenseRule::blocked(
            "CC-BY-SA",
            r"\bCC[- ]BY[- ]SA\b|Creative Commons Attribution[- ]ShareAlike",
            false,
            &[],
        ),
    ]
}

pub fn informational_rules() -> Vec<LicenseRule> {
    vec![
        LicenseRule::informational("MIT", r"MIT\s+License|\bMIT\b"),
        LicenseRule::informational("Apache", r"Apache\s+License,?\s+(?:Version\s+)?2\.0|Apache-2\.0"),
        LicenseRule::informational("BSD", r"BSD\s+[23]-Clause|BSD-[23]-Clause"),
    ]
}

pub const COMMERCIAL_PHRASES: &[&str] = &[
    "for non-commercial use only",
    "not for commercial use",
    "commercial use is prohibited",
    "commercial use prohibited",
    "may not be used for commercial purposes",
    "商用利用禁止",
    "商用禁止",
    "営利目的での使用を禁止",
    "仅限非商业用途",
    "禁止商业使用",
    "kommerzielle Nutzung untersagt",
    "usage commercial interdit",
];

pub const EXCLUSIONS: &[&str] = &[
    ".git/",
    "node_modules/",
    "__pycache__/",
    ".venv/",
    "venv/",
    "target/",
    "dist/",
    "build/",
    ".mypy_cache/",
    ".pytest_cache/",
    "*.min.js",
];

pub const SCAN_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".cpp", ".hpp", ".c", ".h", ".rs", ".go", ".java",
];

pub const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".cpp", ".hpp", ".c", ".h", ".rs", ".go", ".java",
];

pub const MANIFEST_FILES: &[&str] = &[
    "requirements.txt",
    "requirements-dev.txt",
    "dev-requirements.txt",
    "package.json",
];

pub const POLICY_DOCUMENTS: &[&str] = &["README", "CONTRIBUTING", "CHANGELOG", "LICENSING", "COMPLIANCE"];

pub const SELF_FILES: &[&str] = &[
    "builtin_rules.rs",
    ".license-gate.toml",
    "license-gate.toml",
    "license_checker.py",
];

pub const HEADER_SIGNATURES: &[&str] = &[
    "SPDX-License-Identifier",
    "MIT License",
    "Apache License",
    "Licensed under",
    "BSD 3-Clause",
    "BSD 2-Clause",
    "ISC License",
    "The Unlicense",
];
