use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

use cosmwasm_std::Binary;

use crate::ProposalError;

/// JSON message passed verbatim to a contract entry point.
///
/// On the wire it is embedded as raw JSON rather than as a base64 blob, and the
/// exact bytes are preserved in both directions.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RawContractMessage(Vec<u8>);

impl RawContractMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_binary(&self) -> Binary {
        Binary::from(self.0.as_slice())
    }

    /// Contract messages must be JSON objects.
    pub fn validate(&self) -> Result<(), ProposalError> {
        let invalid = |msg: String| ProposalError::InvalidJson { field: "msg", msg };
        if self.0.is_empty() {
            return Err(ProposalError::EmptyField { field: "msg" });
        }
        let value: serde_json::Value =
            serde_json::from_slice(&self.0).map_err(|e| invalid(e.to_string()))?;
        if !value.is_object() {
            return Err(invalid("not an object".to_owned()));
        }
        Ok(())
    }
}

impl From<Vec<u8>> for RawContractMessage {
    fn from(bytes: Vec<u8>) -> Self {
        RawContractMessage(bytes)
    }
}

impl From<&[u8]> for RawContractMessage {
    fn from(bytes: &[u8]) -> Self {
        RawContractMessage(bytes.to_vec())
    }
}

impl From<&str> for RawContractMessage {
    fn from(json: &str) -> Self {
        RawContractMessage(json.as_bytes().to_vec())
    }
}

impl From<String> for RawContractMessage {
    fn from(json: String) -> Self {
        RawContractMessage(json.into_bytes())
    }
}

impl From<Binary> for RawContractMessage {
    fn from(bin: Binary) -> Self {
        RawContractMessage(bin.0)
    }
}

impl fmt::Debug for RawContractMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawContractMessage({})", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for RawContractMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            return serializer.serialize_unit();
        }
        let text = std::str::from_utf8(&self.0).map_err(S::Error::custom)?;
        let raw = RawValue::from_string(text.to_owned()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawContractMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        match raw.get() {
            "null" => Ok(RawContractMessage::default()),
            text if text.is_empty() => Err(D::Error::custom("empty raw message")),
            text => Ok(RawContractMessage::from(text)),
        }
    }
}

impl JsonSchema for RawContractMessage {
    fn schema_name() -> String {
        "RawContractMessage".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <serde_json::Value>::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        msg: RawContractMessage,
    }

    #[test]
    fn embedded_verbatim() {
        // spacing and key order must survive untouched
        let msg = RawContractMessage::from(r#"{"b": 1,"a":{}}"#);
        let json = serde_json::to_string(&Wrapper { msg: msg.clone() }).unwrap();
        assert_eq!(json, r#"{"msg":{"b": 1,"a":{}}}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.msg, msg);
    }

    #[test]
    fn empty_is_null() {
        let json = serde_json::to_string(&Wrapper {
            msg: RawContractMessage::default(),
        })
        .unwrap();
        assert_eq!(json, r#"{"msg":null}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert!(back.msg.is_empty());
    }

    #[test]
    fn invalid_json_does_not_encode() {
        let msg = RawContractMessage::from("{not json");
        assert!(serde_json::to_string(&Wrapper { msg }).is_err());
    }

    #[test]
    fn validate_requires_object() {
        RawContractMessage::from(r#"{"foo":"bar"}"#).validate().unwrap();
        assert_eq!(
            RawContractMessage::default().validate().unwrap_err(),
            ProposalError::EmptyField { field: "msg" }
        );
        assert!(matches!(
            RawContractMessage::from("[1,2]").validate().unwrap_err(),
            ProposalError::InvalidJson { field: "msg", .. }
        ));
    }
}
