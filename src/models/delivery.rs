use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Lifecycle phase of a delivery, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Prep,
    Fab,
    Pintura,
    Almacen,
    Entregado,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prep => "prep",
            Stage::Fab => "fab",
            Stage::Pintura => "pintura",
            Stage::Almacen => "almacen",
            Stage::Entregado => "entregado",
        }
    }

    pub fn parse(value: &str) -> Option<Stage> {
        match value {
            "prep" => Some(Stage::Prep),
            "fab" => Some(Stage::Fab),
            "pintura" => Some(Stage::Pintura),
            "almacen" => Some(Stage::Almacen),
            "entregado" => Some(Stage::Entregado),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage narrowing passed into the overview by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFilter {
    All,
    Only(Stage),
}

impl StageFilter {
    pub fn matches(self, stage: Stage) -> bool {
        match self {
            StageFilter::All => true,
            StageFilter::Only(wanted) => wanted == stage,
        }
    }
}

/// One partial delivery event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub qty: f64,
}

impl HistoryEntry {
    pub fn from_json(json: &Value) -> Self {
        HistoryEntry {
            date: json
                .get("date")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            qty: json.get("qty").and_then(|v| v.as_f64()).unwrap_or(0.0),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "date": self.date,
            "qty": self.qty,
        })
    }
}

/// Per-phase completion values. Derivation reads these as percentages; the
/// action surface also writes unit counts into `entregado` and `fab`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fab: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pintura: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub almacen: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entregado: Option<f64>,
}

impl FlowMap {
    pub fn from_json(json: &Value) -> Self {
        FlowMap {
            prep: json.get("prep").and_then(|v| v.as_f64()),
            fab: json.get("fab").and_then(|v| v.as_f64()),
            pintura: json.get("pintura").and_then(|v| v.as_f64()),
            almacen: json.get("almacen").and_then(|v| v.as_f64()),
            entregado: json.get("entregado").and_then(|v| v.as_f64()),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (stage, value) in self.phases() {
            if let Some(value) = value {
                map.insert(stage.as_str().to_string(), json!(value));
            }
        }
        Value::Object(map)
    }

    /// Phase values in workflow order.
    pub fn phases(&self) -> [(Stage, Option<f64>); 5] {
        [
            (Stage::Prep, self.prep),
            (Stage::Fab, self.fab),
            (Stage::Pintura, self.pintura),
            (Stage::Almacen, self.almacen),
            (Stage::Entregado, self.entregado),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.phases().iter().all(|(_, value)| value.is_none())
    }
}

/// One tracked order ("ficha"), fulfilled in partial deliveries over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub concept: String,
    pub company: String,
    pub date_ped: String,
    pub date_prev: String,
    pub total: f64,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_notes: Option<String>,
}

impl DeliveryRecord {
    pub fn new(ref_id: String) -> Self {
        DeliveryRecord {
            ref_id,
            concept: String::new(),
            company: String::new(),
            date_ped: String::new(),
            date_prev: String::new(),
            total: 0.0,
            history: Vec::new(),
            flow: None,
            stage: None,
            partial_notes: None,
        }
    }

    /// Reads a record from a raw JSON object. Absent or mistyped fields fall
    /// back to their defaults; a negative or non-finite total reads as 0.
    pub fn from_json(json: &Value) -> Self {
        DeliveryRecord {
            ref_id: json
                .get("ref")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            concept: json
                .get("concept")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            company: json
                .get("company")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            date_ped: json
                .get("datePed")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            date_prev: json
                .get("datePrev")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            total: json
                .get("total")
                .and_then(|v| v.as_f64())
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(0.0),
            history: json
                .get("history")
                .and_then(|v| v.as_array())
                .map(|entries| entries.iter().map(HistoryEntry::from_json).collect())
                .unwrap_or_default(),
            flow: json
                .get("flow")
                .filter(|v| v.is_object())
                .map(FlowMap::from_json),
            stage: json
                .get("stage")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            partial_notes: json
                .get("partialNotes")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("ref".to_string(), json!(self.ref_id));
        map.insert("concept".to_string(), json!(self.concept));
        map.insert("company".to_string(), json!(self.company));
        map.insert("datePed".to_string(), json!(self.date_ped));
        map.insert("datePrev".to_string(), json!(self.date_prev));
        map.insert("total".to_string(), json!(self.total));
        map.insert(
            "history".to_string(),
            Value::Array(self.history.iter().map(HistoryEntry::to_json).collect()),
        );
        if let Some(flow) = &self.flow {
            map.insert("flow".to_string(), flow.to_json());
        }
        if let Some(stage) = &self.stage {
            map.insert("stage".to_string(), json!(stage));
        }
        if let Some(notes) = &self.partial_notes {
            map.insert("partialNotes".to_string(), json!(notes));
        }
        Value::Object(map)
    }

    /// Notes shown for the record: explicit notes when present, otherwise the
    /// history rendered one `date: qty` per line.
    pub fn notes_text(&self) -> String {
        if let Some(notes) = &self.partial_notes {
            if !notes.is_empty() {
                return notes.clone();
            }
        }
        self.history
            .iter()
            .map(|entry| format!("{}: {}", entry.date, entry.qty))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Derived fulfillment state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub total: f64,
    pub delivered: f64,
    pub pending: f64,
    pub pct: u32,
    pub stage: Stage,
}

impl Progress {
    /// Percentage capped at 100 for display; raw `pct` exceeds 100 when a
    /// record is over-delivered.
    pub fn pct_clamped(&self) -> u32 {
        self.pct.min(100)
    }
}
