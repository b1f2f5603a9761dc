use serde::{Deserialize, Serialize};

use crate::address::AddressVariant;
use crate::credential::Credential;

/// Spending and staking key hashes of a base address, as lowercase hex.
///
/// The JSON shape `{"spending": "...", "staking": "..."}` is read by the
/// address bookkeeping on the app side and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHashPair {
    pub spending: String,
    pub staking: String,
}

/// Extract the key-hash pair from a decoded address.
///
/// Only a base address whose payment and staking credentials are both key
/// hashes has one. Everything else (legacy, pointer, enterprise, reward,
/// or any script credential) yields `None`; this is not an error.
pub fn extract_key_hashes(variant: &AddressVariant) -> Option<KeyHashPair> {
    match variant {
        AddressVariant::Base {
            payment: Credential::KeyHash(payment),
            staking: Credential::KeyHash(staking),
            ..
        } => Some(KeyHashPair {
            spending: payment.to_hex(),
            staking: staking.to_hex(),
        }),
        AddressVariant::Base { .. }
        | AddressVariant::Legacy(_)
        | AddressVariant::Pointer { .. }
        | AddressVariant::Enterprise { .. }
        | AddressVariant::Reward { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byron::ByronAddress;
    use crate::credential::{KeyHash, ScriptHash};
    use crate::network::NetworkId;
    use crate::pointer::ChainPointer;

    const P: [u8; 32] = [0x0a; 32];
    const S: [u8; 32] = [0xb1; 32];

    fn key(b: [u8; 32]) -> Credential {
        Credential::KeyHash(KeyHash(b))
    }

    fn script(b: [u8; 32]) -> Credential {
        Credential::Script(ScriptHash(b))
    }

    #[test]
    fn base_with_two_key_hashes() {
        let variant = AddressVariant::Base {
            network: NetworkId::Mainnet,
            payment: key(P),
            staking: key(S),
        };
        let pair = extract_key_hashes(&variant).unwrap();
        assert_eq!(pair.spending, "0a".repeat(32));
        assert_eq!(pair.staking, "b1".repeat(32));
    }

    #[test]
    fn base_with_script_on_either_side() {
        for (payment, staking) in [
            (script(P), key(S)),
            (key(P), script(S)),
            (script(P), script(S)),
        ] {
            let variant = AddressVariant::Base {
                network: NetworkId::Testnet,
                payment,
                staking,
            };
            assert_eq!(extract_key_hashes(&variant), None);
        }
    }

    #[test]
    fn legacy_has_no_pair() {
        let variant = AddressVariant::Legacy(ByronAddress::new(vec![0x80]));
        assert_eq!(extract_key_hashes(&variant), None);
    }

    #[test]
    fn pointer_has_no_pair() {
        let variant = AddressVariant::Pointer {
            network: NetworkId::Mainnet,
            payment: key(P),
            pointer: ChainPointer::new(1, 2, 3),
        };
        assert_eq!(extract_key_hashes(&variant), None);
    }

    #[test]
    fn enterprise_has_no_pair() {
        let variant = AddressVariant::Enterprise {
            network: NetworkId::Mainnet,
            payment: key(P),
        };
        assert_eq!(extract_key_hashes(&variant), None);
    }

    #[test]
    fn reward_has_no_pair() {
        let variant = AddressVariant::Reward {
            network: NetworkId::Mainnet,
            staking: key(S),
        };
        assert_eq!(extract_key_hashes(&variant), None);
    }

    #[test]
    fn json_shape_is_stable() {
        let pair = KeyHashPair {
            spending: "ab".repeat(32),
            staking: "cd".repeat(32),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "spending": "ab".repeat(32),
                "staking": "cd".repeat(32),
            })
        );
    }
}
