//! Raw signal counts from a user's SMS log.

use super::signals::{
    COMPILED_BODY_SIGNALS, DIGIT_REGEX, PHISHING_MIN_DIGITS, POSPAGO_REGEX, PREPAGO_REGEX,
    WHATSAPP_REGEX,
};
use super::{FeatureRecord, BASE_FEATURES};
use crate::types::message::{AddressField, BodyField, Message};
use std::collections::HashSet;

/// Counts keyword and sender signals over a message collection.
///
/// Every count is the number of messages matching, so a message contributes
/// at most one to each signal regardless of how often a keyword repeats.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor;

impl SignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the raw variable record.
    ///
    /// An empty log short-circuits to a record holding only the base
    /// features, all zero. Downstream stages then see every other variable
    /// as absent.
    pub fn extract(&self, messages: &[Message]) -> FeatureRecord {
        if messages.is_empty() {
            return FeatureRecord::zeros(BASE_FEATURES);
        }

        let body_field = BodyField::resolve(messages);
        let address_field = AddressField::resolve(messages);

        let mut counts = vec![0u64; COMPILED_BODY_SIGNALS.len()];
        let mut pospago = 0u64;
        let mut prepago = 0u64;
        let mut addresses: HashSet<&str> = HashSet::new();
        let mut phishing = 0u64;
        let mut email = 0u64;
        let mut whatsapp = 0u64;

        for message in messages {
            let body = body_field.read(message);
            for (count, signal) in counts.iter_mut().zip(COMPILED_BODY_SIGNALS.iter()) {
                if signal.is_match(body) {
                    *count += 1;
                }
            }
            if POSPAGO_REGEX.is_match(body) {
                pospago += 1;
            }
            if PREPAGO_REGEX.is_match(body) {
                prepago += 1;
            }

            let address = address_field.read(message);
            addresses.insert(address);
            if DIGIT_REGEX.find_iter(address).count() >= PHISHING_MIN_DIGITS {
                phishing += 1;
            }
            if address.contains('@') {
                email += 1;
            }
            if WHATSAPP_REGEX.is_match(address) {
                whatsapp += 1;
            }
        }

        let mut record = FeatureRecord::new();
        record.insert("message_count", messages.len() as f64);
        for (signal, count) in COMPILED_BODY_SIGNALS.iter().zip(counts) {
            record.insert(signal.name, count as f64);
        }
        record.insert("pospago_vs_prepago", pospago as f64 - prepago as f64);
        record.insert("address_count", addresses.len() as f64);
        record.insert("pishing_count", phishing as f64);
        record.insert("email_count", email as f64);
        record.insert("whatsapp_count", whatsapp as f64);

        record
    }
}
