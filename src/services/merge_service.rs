use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Reconciles the primary and secondary record lists into one list keyed by
/// `ref`. Every field explicitly present on a primary record wins; secondary
/// fields fill the gaps. Silent overwrite is the policy; there is no
/// conflict reporting.
///
/// Output order is stable and input-order-preserving: secondary records in
/// their input order, then primary-only records in primary input order.
/// Records without a non-empty `ref` are skipped.
pub fn merge_records(primary: &[Value], secondary: &[Value]) -> Vec<Value> {
    let mut order: Vec<String> = Vec::new();
    let mut by_ref: HashMap<String, Value> = HashMap::new();

    for record in secondary {
        let Some(ref_id) = record_ref(record) else {
            continue;
        };
        if !by_ref.contains_key(&ref_id) {
            order.push(ref_id.clone());
        }
        by_ref.insert(ref_id, record.clone());
    }

    for record in primary {
        let Some(ref_id) = record_ref(record) else {
            continue;
        };
        match by_ref.entry(ref_id) {
            Entry::Occupied(mut existing) => overlay(existing.get_mut(), record),
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(record.clone());
            }
        }
    }

    order
        .into_iter()
        .filter_map(|ref_id| by_ref.remove(&ref_id))
        .collect()
}

fn record_ref(record: &Value) -> Option<String> {
    record
        .get("ref")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Shallow overlay: every key present on `over` replaces the value on `base`.
fn overlay(base: &mut Value, over: &Value) {
    let (Some(base_map), Some(over_map)) = (base.as_object_mut(), over.as_object()) else {
        return;
    };
    for (key, value) in over_map {
        base_map.insert(key.clone(), value.clone());
    }
}
