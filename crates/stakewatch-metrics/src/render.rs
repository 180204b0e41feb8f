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
//! Snapshot rendering into the Prometheus text exposition format

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

use crate::registry::{ScrapeRegistry, SlotKey};
use crate::types::Metric;

/// Rendering failures
#[derive(Error, Debug)]
pub enum RenderError {
    /// Metric construction, registration or encoding failed
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// An encoded scrape body
#[derive(Debug, Clone)]
pub struct Exposition {
    /// Value for the `Content-Type` header
    pub content_type: String,
    /// Encoded metric families
    pub body: Vec<u8>,
}

/// Encode every populated slot of `registry`, each family carrying `const_labels`.
///
/// The registry is only read. Output is sorted by family name, then labels.
pub fn render(
    registry: &ScrapeRegistry,
    const_labels: &BTreeMap<String, String>,
) -> Result<Exposition, RenderError> {
    let prometheus = build_registry(registry.snapshot(), const_labels)?;
    let families = prometheus.gather();

    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    encoder.encode(&families, &mut body)?;
    debug!(families = families.len(), bytes = body.len(), "Encoded scrape");

    Ok(Exposition {
        content_type: encoder.format_type().to_string(),
        body,
    })
}

fn build_registry(
    slots: BTreeMap<SlotKey, f64>,
    const_labels: &BTreeMap<String, String>,
) -> Result<Registry, RenderError> {
    let const_labels: HashMap<String, String> = const_labels
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let mut families: BTreeMap<Metric, Vec<(Vec<String>, f64)>> = BTreeMap::new();
    for (key, value) in slots {
        families
            .entry(key.metric)
            .or_default()
            .push((key.label_values, value));
    }

    let registry = Registry::new();
    for (metric, entries) in families {
        let opts = Opts::new(metric.name(), metric.help()).const_labels(const_labels.clone());

        if metric.label_names().is_empty() {
            let gauge = Gauge::with_opts(opts)?;
            if let Some((_, value)) = entries.last() {
                gauge.set(*value);
            }
            registry.register(Box::new(gauge))?;
        } else {
            let gauges = GaugeVec::new(opts, metric.label_names())?;
            for (label_values, value) in &entries {
                let values: Vec<&str> = label_values.iter().map(String::as_str).collect();
                gauges.get_metric_with_label_values(&values)?.set(*value);
            }
            registry.register(Box::new(gauges))?;
        }
    }

    Ok(registry)
}
