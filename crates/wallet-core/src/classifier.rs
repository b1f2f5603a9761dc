//! Splits a transaction's inputs and outputs into the address lists shown
//! on the transaction details screen.
//!
//! Each side is deduplicated (first occurrence wins, including its assets),
//! labelled against the [`OwnershipIndex`], then highlighted and filtered
//! according to the transaction direction. Entries dropped by a filter are
//! counted as omitted.

use std::collections::HashSet;

use chain_ada::Address;
use serde::Serialize;

use crate::ownership::{DerivationLabel, OwnershipIndex};
use crate::types::{TokenEntry, Transaction, TransactionDirection, TxIo};

/// Which entries of a side are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Never,
    Mine,
    NotMine,
    NotChange,
}

impl Highlight {
    pub fn applies(self, label: DerivationLabel) -> bool {
        match self {
            Highlight::Never => false,
            Highlight::Mine => label.is_mine(),
            Highlight::NotMine => !label.is_mine(),
            Highlight::NotChange => !label.is_change(),
        }
    }
}

/// Which entries of a side stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    KeepMine,
}

impl Filter {
    pub fn keeps(self, label: DerivationLabel) -> bool {
        match self {
            Filter::KeepMine => label.is_mine(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideRule {
    pub highlight: Highlight,
    pub filter: Option<Filter>,
}

impl SideRule {
    const fn highlight(highlight: Highlight) -> Self {
        Self {
            highlight,
            filter: None,
        }
    }
}

/// Display rules for both sides of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRules {
    pub inputs: SideRule,
    pub outputs: SideRule,
}

impl DirectionRules {
    pub const fn for_direction(direction: TransactionDirection) -> Self {
        match direction {
            TransactionDirection::Sent => Self {
                inputs: SideRule::highlight(Highlight::Never),
                outputs: SideRule::highlight(Highlight::NotMine),
            },
            TransactionDirection::Received => Self {
                inputs: SideRule::highlight(Highlight::Never),
                outputs: SideRule {
                    highlight: Highlight::Mine,
                    filter: Some(Filter::KeepMine),
                },
            },
            TransactionDirection::Intrawallet => Self {
                inputs: SideRule::highlight(Highlight::Never),
                outputs: SideRule::highlight(Highlight::NotChange),
            },
            TransactionDirection::Multi => Self {
                inputs: SideRule::highlight(Highlight::Mine),
                outputs: SideRule::highlight(Highlight::Mine),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantEntry {
    pub address: Address,
    pub derivation_label: DerivationLabel,
    pub is_highlighted: bool,
    pub assets: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedParticipants {
    pub from_entries: Vec<ParticipantEntry>,
    pub from_omitted_count: usize,
    pub to_entries: Vec<ParticipantEntry>,
    pub to_omitted_count: usize,
    /// Addresses of this transaction found in both ownership chains.
    pub anomalies: Vec<Address>,
}

pub fn classify(transaction: &Transaction, index: &OwnershipIndex) -> ClassifiedParticipants {
    let rules = DirectionRules::for_direction(transaction.direction);
    let (from_entries, from_omitted_count) = classify_side(&transaction.inputs, rules.inputs, index);
    let (to_entries, to_omitted_count) = classify_side(&transaction.outputs, rules.outputs, index);

    let anomalies = dedup(transaction.inputs.iter().chain(&transaction.outputs))
        .into_iter()
        .filter(|io| index.is_anomalous(&io.address))
        .map(|io| io.address.clone())
        .collect::<Vec<_>>();
    for address in &anomalies {
        tracing::warn!(tx = %transaction.id, %address, "ownership index lists address as both receive and change");
    }

    ClassifiedParticipants {
        from_entries,
        from_omitted_count,
        to_entries,
        to_omitted_count,
        anomalies,
    }
}

fn classify_side(ios: &[TxIo], rule: SideRule, index: &OwnershipIndex) -> (Vec<ParticipantEntry>, usize) {
    let unique = dedup(ios);
    let total = unique.len();

    let entries: Vec<ParticipantEntry> = unique
        .into_iter()
        .map(|io| (io, index.classify(&io.address)))
        .filter(|(_, label)| rule.filter.is_none_or(|f| f.keeps(*label)))
        .map(|(io, label)| ParticipantEntry {
            address: io.address.clone(),
            derivation_label: label,
            is_highlighted: rule.highlight.applies(label),
            assets: io.assets.clone(),
        })
        .collect();

    let omitted = total - entries.len();
    (entries, omitted)
}

/// Unique by address bytes, in first-seen order.
fn dedup<'a>(ios: impl IntoIterator<Item = &'a TxIo>) -> Vec<&'a TxIo> {
    let mut seen = HashSet::new();
    ios.into_iter().filter(|io| seen.insert(&io.address)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn addr(b: u8) -> Address {
        Address::from_bytes(vec![0x61, b])
    }

    fn io(b: u8) -> TxIo {
        TxIo {
            address: addr(b),
            assets: vec![],
        }
    }

    fn io_with_asset(b: u8, amount: &str) -> TxIo {
        TxIo {
            address: addr(b),
            assets: vec![TokenEntry {
                identifier: "tok".into(),
                amount: amount.into(),
            }],
        }
    }

    fn tx(direction: TransactionDirection, inputs: Vec<TxIo>, outputs: Vec<TxIo>) -> Transaction {
        Transaction {
            id: "tx".into(),
            direction,
            inputs,
            outputs,
            amount: vec![],
            fee: None,
            confirmations: 1,
        }
    }

    // receive: 1 -> 0; change: 3 -> 0; 2 is foreign
    fn index() -> OwnershipIndex {
        OwnershipIndex::from_ranges([addr(1)], [addr(3)])
    }

    const RECEIVE: DerivationLabel = DerivationLabel::Receive(0);
    const CHANGE: DerivationLabel = DerivationLabel::Change(0);
    const FOREIGN: DerivationLabel = DerivationLabel::NotMine;

    fn highlights(entries: &[ParticipantEntry]) -> Vec<bool> {
        entries.iter().map(|e| e.is_highlighted).collect()
    }

    fn addresses(entries: &[ParticipantEntry]) -> Vec<Address> {
        entries.iter().map(|e| e.address.clone()).collect()
    }

    #[test]
    fn rule_table_every_cell() {
        let cases = [
            (TransactionDirection::Sent, [false, false, false], None, [false, false, true], None),
            (
                TransactionDirection::Received,
                [false, false, false],
                None,
                [true, true, false],
                Some(Filter::KeepMine),
            ),
            (TransactionDirection::Intrawallet, [false, false, false], None, [true, false, true], None),
            (TransactionDirection::Multi, [true, true, false], None, [true, true, false], None),
        ];
        for (direction, input_hl, input_filter, output_hl, output_filter) in cases {
            let rules = DirectionRules::for_direction(direction);
            for (i, label) in [RECEIVE, CHANGE, FOREIGN].into_iter().enumerate() {
                assert_eq!(rules.inputs.highlight.applies(label), input_hl[i], "{direction:?} input {label:?}");
                assert_eq!(rules.outputs.highlight.applies(label), output_hl[i], "{direction:?} output {label:?}");
            }
            assert_eq!(rules.inputs.filter, input_filter, "{direction:?}");
            assert_eq!(rules.outputs.filter, output_filter, "{direction:?}");
        }
    }

    #[test]
    fn keep_mine_filter() {
        assert!(Filter::KeepMine.keeps(RECEIVE));
        assert!(Filter::KeepMine.keeps(CHANGE));
        assert!(!Filter::KeepMine.keeps(FOREIGN));
    }

    #[test]
    fn dedup_keeps_first_seen_order_for_every_direction() {
        for direction in [
            TransactionDirection::Sent,
            TransactionDirection::Received,
            TransactionDirection::Intrawallet,
            TransactionDirection::Multi,
        ] {
            let t = tx(direction, vec![io(2), io(2), io(4)], vec![]);
            let result = classify(&t, &index());
            assert_eq!(addresses(&result.from_entries), vec![addr(2), addr(4)]);
            assert_eq!(result.from_omitted_count, 0);
        }
    }

    #[test]
    fn dedup_keeps_assets_of_first_occurrence() {
        let t = tx(
            TransactionDirection::Sent,
            vec![],
            vec![io_with_asset(2, "1"), io_with_asset(2, "99")],
        );
        let result = classify(&t, &index());
        assert_eq!(result.to_entries.len(), 1);
        assert_eq!(result.to_entries[0].assets[0].amount, "1");
    }

    #[test]
    fn received_keeps_only_mine_and_counts_the_rest() {
        let t = tx(TransactionDirection::Received, vec![io(2)], vec![io(1), io(1), io(2)]);
        let result = classify(&t, &index());
        assert_eq!(
            result.to_entries,
            vec![ParticipantEntry {
                address: addr(1),
                derivation_label: RECEIVE,
                is_highlighted: true,
                assets: vec![],
            }]
        );
        assert_eq!(result.to_omitted_count, 1);
        assert_eq!(highlights(&result.from_entries), vec![false]);
        assert_eq!(result.from_omitted_count, 0);
    }

    #[test]
    fn sent_highlights_foreign_outputs() {
        let t = tx(TransactionDirection::Sent, vec![io(1)], vec![io(1), io(2)]);
        let result = classify(&t, &index());
        assert_eq!(addresses(&result.to_entries), vec![addr(1), addr(2)]);
        assert_eq!(highlights(&result.to_entries), vec![false, true]);
        assert_eq!(result.to_omitted_count, 0);
        assert_eq!(highlights(&result.from_entries), vec![false]);
    }

    #[test]
    fn intrawallet_highlights_everything_but_change() {
        let t = tx(TransactionDirection::Intrawallet, vec![io(1)], vec![io(1), io(3)]);
        let result = classify(&t, &index());
        assert_eq!(highlights(&result.to_entries), vec![true, false]);
        assert_eq!(result.to_entries[1].derivation_label, CHANGE);
    }

    #[test]
    fn multi_highlights_mine_on_both_sides() {
        let t = tx(TransactionDirection::Multi, vec![io(1), io(2)], vec![io(3), io(2)]);
        let result = classify(&t, &index());
        assert_eq!(highlights(&result.from_entries), vec![true, false]);
        assert_eq!(highlights(&result.to_entries), vec![true, false]);
        assert_eq!(result.from_omitted_count, 0);
        assert_eq!(result.to_omitted_count, 0);
    }

    #[test]
    fn empty_sides_are_empty() {
        let t = tx(TransactionDirection::Received, vec![], vec![]);
        let result = classify(&t, &index());
        assert_eq!(result, ClassifiedParticipants::default());
    }

    #[test]
    fn anomalous_address_is_receive_and_reported_once() {
        let index = OwnershipIndex::new(
            HashMap::from([(addr(5), 2)]),
            HashMap::from([(addr(5), 9)]),
        );
        let t = tx(TransactionDirection::Multi, vec![io(5)], vec![io(5), io(2)]);
        let result = classify(&t, &index);
        assert_eq!(result.from_entries[0].derivation_label, DerivationLabel::Receive(2));
        assert_eq!(result.anomalies, vec![addr(5)]);
    }
}
