use crate::domain::model::Segment;
use serde_json::{Map, Value};

/// Borrowed view of a JSON value as the four shapes path descent cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Map(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
    Absent,
}

impl<'a> Node<'a> {
    pub fn descend(self, segment: &Segment) -> Node<'a> {
        match (self, segment) {
            (Node::Sequence(items), Segment::Index(i)) => items.get(*i).into(),
            (Node::Map(map), Segment::Key(key)) => map.get(key).into(),
            _ => Node::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Node::Absent,
            Value::Object(map) => Node::Map(map),
            Value::Array(items) => Node::Sequence(items),
            scalar => Node::Scalar(scalar),
        }
    }
}

impl<'a> From<Option<&'a Value>> for Node<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Node::Absent, Node::from)
    }
}
