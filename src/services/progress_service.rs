use crate::models::delivery::{DeliveryRecord, FlowMap, HistoryEntry, Progress, Stage};

/// Derives the fulfillment numbers and lifecycle stage for one record.
///
/// Stage precedence: an explicit `stage` field naming a known phase, then
/// the `flow` map when it carries any value, then inference from the
/// delivery history. The record itself is never mutated.
pub fn derive_progress(record: &DeliveryRecord) -> Progress {
    let total = record.total;
    let delivered = sum_delivered(&record.history);
    let pending = (total - delivered).max(0.0);
    let pct = if total > 0.0 {
        (100.0 * delivered / total).round() as u32
    } else {
        0
    };

    let stage = explicit_stage(record)
        .or_else(|| {
            record
                .flow
                .as_ref()
                .filter(|flow| !flow.is_empty())
                .map(stage_from_flow)
        })
        .unwrap_or_else(|| stage_from_history(total, delivered));

    Progress {
        total,
        delivered,
        pending,
        pct,
        stage,
    }
}

/// Sum of delivered quantities; a non-finite quantity counts as 0.
pub fn sum_delivered(history: &[HistoryEntry]) -> f64 {
    history
        .iter()
        .map(|entry| if entry.qty.is_finite() { entry.qty } else { 0.0 })
        .sum()
}

fn explicit_stage(record: &DeliveryRecord) -> Option<Stage> {
    record.stage.as_deref().and_then(Stage::parse)
}

/// History inference: complete once delivered reaches the total, in
/// fabrication once anything was delivered, otherwise still in preparation.
pub fn stage_from_history(total: f64, delivered: f64) -> Stage {
    if total > 0.0 && delivered >= total {
        Stage::Entregado
    } else if delivered > 0.0 {
        Stage::Fab
    } else {
        Stage::Prep
    }
}

/// Flow classification over the fixed phase order: the first phase still
/// short of 100 is current. With no such phase, the last recorded value
/// away from 100 wins; when every recorded value sits exactly at 100 the
/// record classifies as its furthest recorded phase.
pub fn stage_from_flow(flow: &FlowMap) -> Stage {
    let mut first_in_progress = None;
    let mut last_not_complete = None;
    let mut last_recorded = None;

    for (stage, value) in flow.phases() {
        let Some(pct) = value.filter(|p| p.is_finite()) else {
            continue;
        };
        last_recorded = Some(stage);
        if (0.0..100.0).contains(&pct) && first_in_progress.is_none() {
            first_in_progress = Some(stage);
        }
        if pct != 100.0 {
            last_not_complete = Some(stage);
        }
    }

    first_in_progress
        .or(last_not_complete)
        .or(last_recorded)
        .unwrap_or(Stage::Prep)
}
