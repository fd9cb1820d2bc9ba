// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use ecosystem_registry::maintenance::{candidate_name, owner_repo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|url: &str| {
    if let Some((owner, repo)) = owner_repo(url) {
        assert!(!owner.is_empty() && !repo.is_empty());
        assert!(!owner.contains('/') && !repo.contains('/'));
    }
    if let Some(name) = candidate_name(url) {
        assert_eq!(name.matches('/').count(), 1);
    }
});
