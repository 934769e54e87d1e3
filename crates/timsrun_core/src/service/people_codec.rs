//! Encoding of the people collection into one persisted blob.
//!
//! # Invariants
//! - Encoding is deterministic for equal collections.
//! - Decoding rejects the whole blob on any invalid record; there is no
//!   partial recovery.

use crate::model::order::OrderId;
use crate::model::person::{Person, PersonId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob key for the current collection schema.
///
/// Changing the suffix starts a fresh collection; older keys stay untouched.
pub const PEOPLE_KEY: &str = "people.v1";

#[derive(Debug)]
pub enum CodecError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    InvalidData(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode people: {err}"),
            Self::Decode(err) => write!(f, "failed to decode people: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted people data: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

/// Serializes the collection in order.
pub fn encode_people(people: &[Person]) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(people).map_err(CodecError::Encode)
}

/// Parses and validates a blob produced by `encode_people`.
///
/// # Errors
/// - `CodecError::Decode` for malformed JSON or unknown enum tags.
/// - `CodecError::InvalidData` for out-of-range counts, or for a person ID
///   or usual-order ID that appears twice.
pub fn decode_people(bytes: &[u8]) -> Result<Vec<Person>, CodecError> {
    let people: Vec<Person> = serde_json::from_slice(bytes).map_err(CodecError::Decode)?;

    let mut seen: HashSet<PersonId> = HashSet::with_capacity(people.len());
    let mut seen_orders: HashSet<OrderId> = HashSet::with_capacity(people.len());
    for person in &people {
        if !seen.insert(person.id) {
            return Err(CodecError::InvalidData(format!(
                "duplicate person id {}",
                person.id
            )));
        }
        if let Some(order) = &person.usual {
            if !seen_orders.insert(order.id) {
                return Err(CodecError::InvalidData(format!(
                    "duplicate order id {}",
                    order.id
                )));
            }
            order.validate().map_err(|err| {
                CodecError::InvalidData(format!("usual order of person {}: {err}", person.id))
            })?;
        }
    }

    Ok(people)
}

#[cfg(test)]
mod tests {
    use super::{decode_people, encode_people, CodecError};
    use crate::model::order::Order;
    use crate::model::person::Person;

    #[test]
    fn encoding_is_deterministic() {
        let mut person = Person::new("Robin");
        person.usual = Some(Order::new());
        let people = vec![person];

        assert_eq!(
            encode_people(&people).unwrap(),
            encode_people(&people).unwrap()
        );
    }

    #[test]
    fn absent_usual_is_omitted_from_the_record() {
        let people = vec![Person::new("Robin")];
        let value: serde_json::Value =
            serde_json::from_slice(&encode_people(&people).unwrap()).unwrap();

        assert!(value[0].get("usual").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let person = Person::new("Twin");
        let bytes = encode_people(&[person.clone(), person]).unwrap();

        let err = decode_people(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::InvalidData(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn shared_usual_order_id_is_rejected() {
        let order = Order::new();
        let mut first = Person::new("Ana");
        first.usual = Some(order.clone());
        let mut second = Person::new("Ben");
        second.usual = Some(order);
        let bytes = encode_people(&[first, second]).unwrap();

        let err = decode_people(&bytes).unwrap_err();
        assert!(err.to_string().contains("duplicate order id"), "{err}");
    }

    #[test]
    fn out_of_range_counts_are_rejected() {
        let mut person = Person::new("Max");
        let mut order = Order::new();
        order.espresso_shots = 9;
        person.usual = Some(order);
        let bytes = encode_people(&[person]).unwrap();

        let err = decode_people(&bytes).unwrap_err();
        assert!(err.to_string().contains("espressoShots (9)"), "{err}");
    }
}
