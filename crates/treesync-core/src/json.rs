//! Conversion between JSON documents and models.
//!
//! Objects become maps, arrays become lists and every scalar (including
//! `null`) becomes a primitive carrying the JSON value.

use crate::list::ListModel;
use crate::map::MapModel;
use crate::model::Model;
use serde_json::{Map, Value};

/// A model whose primitives are JSON scalars.
pub type JsonModel = Model<Value>;

impl From<Value> for Model<Value> {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Model::Map(
                object
                    .into_iter()
                    .map(|(key, child)| (key, Model::from(child)))
                    .collect::<MapModel<Value>>(),
            ),
            Value::Array(array) => Model::List(
                array
                    .into_iter()
                    .map(Model::from)
                    .collect::<ListModel<Value>>(),
            ),
            scalar => Model::Primitive(scalar),
        }
    }
}

impl Model<Value> {
    /// Convert back to JSON. `Absent` has no JSON form.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Model::Absent => None,
            Model::Primitive(value) => Some(value.clone()),
            Model::Map(map) => Some(Value::Object(
                map.iter()
                    .filter_map(|(key, child)| child.to_json().map(|v| (key.clone(), v)))
                    .collect::<Map<String, Value>>(),
            )),
            Model::List(list) => Some(Value::Array(
                list.iter().filter_map(Model::to_json).collect(),
            )),
        }
    }
}
