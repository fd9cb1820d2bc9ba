// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use ecosystem_registry::markdown::normalize;
use ecosystem_registry::submission::parse_submission;
use ecosystem_registry::template::TemplateFields;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|body: &str| {
    // normalizing twice changes nothing
    let once = normalize(body);
    assert_eq!(normalize(&once), once);

    let Ok(fields) = TemplateFields::from_pairs([
        ("Name", "name"),
        ("Repository", "url"),
        ("Labels", "labels"),
        ("Tier", "tier"),
    ]) else {
        return;
    };
    if let Ok(record) = parse_submission(body, &fields) {
        assert!(!record.name.trim().is_empty());
        assert!(record.labels.iter().all(|l| !l.is_empty() && l.trim() == l));
    }
});
