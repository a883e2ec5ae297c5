use std::collections::BTreeMap;

use log::trace;

use crate::telemetry::{DashboardKey, ParameterStore};

#[derive(PartialEq, Clone, Debug)]
pub enum DashboardValue {
    Number(f64),
    Text(String),
}

#[derive(PartialEq, Clone, Debug)]
pub struct DashboardEntry {
    pub group: String,
    pub value: DashboardValue,
}

/// In-memory dashboard, keyed by rendered key name.
#[derive(Default, Debug)]
pub struct TuningDashboard {
    entries: BTreeMap<String, DashboardEntry>,
}

impl TuningDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one group, sorted by name.
    pub fn group<'s>(&'s self, group: &'s str) -> impl Iterator<Item = (&'s str, &'s DashboardValue)> {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.group == group)
            .map(|(name, entry)| (name.as_str(), &entry.value))
    }

    fn insert(&mut self, key: &DashboardKey, value: DashboardValue, overwrite: bool) {
        let name = key.name();
        if !overwrite && self.entries.contains_key(&name) {
            return;
        }

        trace!("dashboard {name} = {value:?}");
        self.entries.insert(
            name,
            DashboardEntry {
                group: key.group(),
                value,
            },
        );
    }
}

impl ParameterStore for TuningDashboard {
    fn register_number(&mut self, key: &DashboardKey, default: f64) {
        self.insert(key, DashboardValue::Number(default), false);
    }

    fn register_string(&mut self, key: &DashboardKey, default: &str) {
        self.insert(key, DashboardValue::Text(default.to_string()), false);
    }

    fn get_number(&self, key: &DashboardKey) -> Option<f64> {
        match self.entries.get(&key.name()).map(|entry| &entry.value) {
            Some(DashboardValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    fn get_string(&self, key: &DashboardKey) -> Option<String> {
        match self.entries.get(&key.name()).map(|entry| &entry.value) {
            Some(DashboardValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn update_number(&mut self, key: &DashboardKey, value: f64) {
        self.insert(key, DashboardValue::Number(value), true);
    }

    fn update_string(&mut self, key: &DashboardKey, value: &str) {
        self.insert(key, DashboardValue::Text(value.to_string()), true);
    }
}
