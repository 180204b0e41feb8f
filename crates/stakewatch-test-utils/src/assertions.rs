// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Assertions over Prometheus text exposition.

/// Value of the sample whose name and label set is exactly `series`,
/// e.g. `cosmos_general_community_pool{chain_id="cosmoshub-4",denom="atom"}`.
pub fn sample_value(body: &str, series: &str) -> Option<f64> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (name, value) = line.rsplit_once(' ')?;
            if name == series {
                value.parse().ok()
            } else {
                None
            }
        })
}

/// Whether any sample of metric family `name` is present
pub fn has_family(body: &str, name: &str) -> bool {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .any(|line| {
            line.strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '))
        })
}

/// Assert that `series` is present with `expected`
pub fn assert_sample(body: &str, series: &str, expected: f64) {
    match sample_value(body, series) {
        Some(actual) => assert!(
            (actual - expected).abs() <= f64::EPSILON * expected.abs().max(1.0),
            "{} should be {}, got {}",
            series,
            expected,
            actual
        ),
        None => panic!("{} missing from exposition:\n{}", series, body),
    }
}

/// Assert that no sample of metric family `name` is present
pub fn assert_family_absent(body: &str, name: &str) {
    assert!(
        !has_family(body, name),
        "{} should be absent from exposition:\n{}",
        name,
        body
    );
}
