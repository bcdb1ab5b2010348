/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use serde_json::Value;

use super::{Log, LogFactory};
use crate::{Error, Result};

/// Name of the field holding the log type.
pub const TYPE: &str = "type";

/// Name of the array field of a log container.
pub const LOGS: &str = "logs";

#[derive(Default)]
pub struct LogSerializer {
    factories: RwLock<HashMap<String, Arc<dyn LogFactory>>>,
}

impl LogSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory for `log_type`, replacing any previous one.
    pub fn add_log_factory(&self, log_type: impl Into<String>, factory: Arc<dyn LogFactory>) {
        self.factories.write().insert(log_type.into(), factory);
    }

    pub fn has_log_factory(&self, log_type: &str) -> bool {
        self.factories.read().contains_key(log_type)
    }

    pub fn serialize_log(&self, log: &dyn Log) -> Result<String> {
        Ok(serde_json::to_string(&self.log_to_value(log)?)?)
    }

    pub fn deserialize_log(&self, json: &str) -> Result<Box<dyn Log>> {
        self.log_from_value(serde_json::from_str(json)?)
    }

    /// Serializes `logs` as a `{"logs": [...]}` container.
    pub fn serialize_container(&self, logs: &[Box<dyn Log>]) -> Result<String> {
        let values = logs
            .iter()
            .map(|log| self.log_to_value(log.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let mut container = serde_json::Map::new();
        container.insert(LOGS.to_owned(), Value::Array(values));
        Ok(serde_json::to_string(&container)?)
    }

    pub fn deserialize_container(&self, json: &str) -> Result<Vec<Box<dyn Log>>> {
        let mut container: Value = serde_json::from_str(json)?;
        match container.get_mut(LOGS).map(Value::take) {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(|value| self.log_from_value(value))
                .collect(),
            _ => Err(Error::InvalidLog(format!(
                "log container has no {:?} array",
                LOGS
            ))),
        }
    }

    fn log_to_value(&self, log: &dyn Log) -> Result<Value> {
        let mut value = log.to_json()?;
        match value.as_object_mut() {
            Some(object) => {
                object.insert(TYPE.to_owned(), Value::String(log.log_type().to_owned()));
                Ok(value)
            }
            None => Err(Error::InvalidLog(format!(
                "{} log is not a JSON object",
                log.log_type()
            ))),
        }
    }

    fn log_from_value(&self, mut value: Value) -> Result<Box<dyn Log>> {
        let log_type = match value.as_object_mut().and_then(|o| o.remove(TYPE)) {
            Some(Value::String(log_type)) => log_type,
            _ => return Err(Error::InvalidLog("missing log type".to_owned())),
        };
        let factory = self
            .factories
            .read()
            .get(&log_type)
            .cloned()
            .ok_or(Error::UnknownLogType(log_type))?;
        factory.create(value)
    }
}

#[cfg(test)]
mod test {
    use std::any::Any;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::ingestion::LogMetadata;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct StartSessionLog {
        #[serde(flatten)]
        metadata: LogMetadata,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct EventLog {
        #[serde(flatten)]
        metadata: LogMetadata,
        event_name: String,
    }

    impl Log for StartSessionLog {
        fn log_type(&self) -> &'static str {
            "start_session"
        }
        fn metadata(&self) -> &LogMetadata {
            &self.metadata
        }
        fn metadata_mut(&mut self) -> &mut LogMetadata {
            &mut self.metadata
        }
        fn to_json(&self) -> Result<Value> {
            Ok(serde_json::to_value(self)?)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl Log for EventLog {
        fn log_type(&self) -> &'static str {
            "event"
        }
        fn metadata(&self) -> &LogMetadata {
            &self.metadata
        }
        fn metadata_mut(&mut self) -> &mut LogMetadata {
            &mut self.metadata
        }
        fn to_json(&self) -> Result<Value> {
            Ok(serde_json::to_value(self)?)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct StartSessionLogFactory;
    impl LogFactory for StartSessionLogFactory {
        fn create(&self, json: Value) -> Result<Box<dyn Log>> {
            Ok(Box::new(serde_json::from_value::<StartSessionLog>(json)?))
        }
    }

    struct EventLogFactory;
    impl LogFactory for EventLogFactory {
        fn create(&self, json: Value) -> Result<Box<dyn Log>> {
            Ok(Box::new(serde_json::from_value::<EventLog>(json)?))
        }
    }

    fn serializer() -> LogSerializer {
        let serializer = LogSerializer::new();
        serializer.add_log_factory("start_session", Arc::new(StartSessionLogFactory));
        serializer.add_log_factory("event", Arc::new(EventLogFactory));
        serializer
    }

    #[test]
    fn test_type_field_added() {
        let log = EventLog {
            metadata: LogMetadata::default(),
            event_name: "click".into(),
        };
        let json = serializer().serialize_log(&log).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["eventName"], "click");
        // Unset metadata is omitted.
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_container_keeps_types_apart() {
        let serializer = serializer();
        let logs: Vec<Box<dyn Log>> = vec![
            Box::new(StartSessionLog {
                metadata: LogMetadata::now(),
            }),
            Box::new(EventLog {
                metadata: LogMetadata::default(),
                event_name: "purchase".into(),
            }),
        ];
        let json = serializer.serialize_container(&logs).unwrap();
        let logs = serializer.deserialize_container(&json).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log_type(), "start_session");
        assert!(logs[0].metadata().timestamp.is_some());
        let event = logs[1].as_any().downcast_ref::<EventLog>().unwrap();
        assert_eq!(event.event_name, "purchase");
    }

    #[test]
    fn test_invalid_logs() {
        let serializer = serializer();
        assert!(matches!(
            serializer.deserialize_log(r#"{"eventName": "click"}"#),
            Err(Error::InvalidLog(_))
        ));
        assert!(matches!(
            serializer.deserialize_log(r#"{"type": "page"}"#),
            Err(Error::UnknownLogType(t)) if t == "page"
        ));
        assert!(matches!(
            serializer.deserialize_log(r#"{"type": "event"}"#),
            Err(Error::JsonError(_))
        ));
        assert!(matches!(
            serializer.deserialize_log("not json"),
            Err(Error::JsonError(_))
        ));
        assert!(matches!(
            serializer.deserialize_container(r#"{"items": []}"#),
            Err(Error::InvalidLog(_))
        ));
    }

    #[test]
    fn test_factory_registration() {
        let serializer = LogSerializer::new();
        assert!(!serializer.has_log_factory("event"));
        serializer.add_log_factory("event", Arc::new(EventLogFactory));
        assert!(serializer.has_log_factory("event"));
    }
}
