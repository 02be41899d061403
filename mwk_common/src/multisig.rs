use std::fmt::Display;
use std::str::FromStr;

use bitcoin::opcodes::all::OP_CHECKMULTISIG;
use bitcoin::script::{Builder, Instruction};
use bitcoin::{Address, PublicKey, Script, ScriptBuf};
use serde::{Deserialize, Serialize};

use crate::{Error, Network};

/// Maximum number of keys of a standard multisig script
pub const MAX_MULTISIG_KEYS: usize = 15;

/// How a multisig script is wrapped in an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    #[serde(rename = "P2SH")]
    P2sh,

    #[serde(rename = "P2SH-P2WSH")]
    P2shP2wsh,

    #[serde(rename = "P2WSH")]
    P2wsh,
}

impl AddressType {
    pub fn is_segwit(&self) -> bool {
        !matches!(self, AddressType::P2sh)
    }
}

impl Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressType::P2sh => write!(f, "P2SH"),
            AddressType::P2shP2wsh => write!(f, "P2SH-P2WSH"),
            AddressType::P2wsh => write!(f, "P2WSH"),
        }
    }
}

impl FromStr for AddressType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P2SH" => Ok(AddressType::P2sh),
            "P2SH-P2WSH" | "P2SH_P2WSH" => Ok(AddressType::P2shP2wsh),
            "P2WSH" => Ok(AddressType::P2wsh),
            _ => Err(Error::InvalidMultisig(format!("unknown address type \"{s}\""))),
        }
    }
}

/// An m-of-n `OP_CHECKMULTISIG` policy over ordered public keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisig {
    address_type: AddressType,
    network: Network,
    required: usize,
    public_keys: Vec<PublicKey>,
}

impl Multisig {
    pub fn new(
        address_type: AddressType,
        network: Network,
        required: usize,
        public_keys: &[String],
    ) -> Result<Self, Error> {
        let public_keys = public_keys
            .iter()
            .map(|k| PublicKey::from_str(k).map_err(|_| Error::InvalidPublicKey(k.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_keys(address_type, network, required, public_keys)
    }

    fn from_keys(
        address_type: AddressType,
        network: Network,
        required: usize,
        public_keys: Vec<PublicKey>,
    ) -> Result<Self, Error> {
        let total = public_keys.len();
        if total == 0 || total > MAX_MULTISIG_KEYS {
            return Err(Error::InvalidMultisig(format!(
                "{total} public keys, expected 1 to {MAX_MULTISIG_KEYS}"
            )));
        }
        if required == 0 || required > total {
            return Err(Error::InvalidMultisig(format!(
                "cannot require {required} of {total} signatures"
            )));
        }
        if address_type.is_segwit() && public_keys.iter().any(|k| !k.compressed) {
            return Err(Error::InvalidMultisig(
                "segwit scripts need compressed public keys".to_string(),
            ));
        }
        Ok(Self {
            address_type,
            network,
            required,
            public_keys,
        })
    }

    /// Parse a bare multisig script, as found in a redeem or witness script
    pub fn from_script(
        script: &Script,
        address_type: AddressType,
        network: Network,
    ) -> Result<Self, Error> {
        let invalid = || Error::InvalidMultisig(format!("not a multisig script: {script}"));
        let instructions = script
            .instructions()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        let [Instruction::Op(first), keys @ .., Instruction::Op(total), Instruction::Op(check)] =
            &instructions[..]
        else {
            return Err(invalid());
        };
        if *check != OP_CHECKMULTISIG {
            return Err(invalid());
        }
        let required = small_int(first.to_u8()).ok_or_else(invalid)?;
        let total = small_int(total.to_u8()).ok_or_else(invalid)?;

        let public_keys = keys
            .iter()
            .map(|i| match i {
                Instruction::PushBytes(bytes) => {
                    PublicKey::from_slice(bytes.as_bytes()).map_err(|_| invalid())
                }
                Instruction::Op(_) => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if public_keys.len() != total {
            return Err(invalid());
        }
        Self::from_keys(address_type, network, required, public_keys)
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn required_signers(&self) -> usize {
        self.required
    }

    pub fn total_signers(&self) -> usize {
        self.public_keys.len()
    }

    pub fn public_keys(&self) -> Vec<String> {
        self.public_keys.iter().map(|k| k.to_string()).collect()
    }

    /// `OP_m <keys> OP_n OP_CHECKMULTISIG`
    pub fn multisig_script(&self) -> ScriptBuf {
        let mut builder = Builder::new().push_int(self.required as i64);
        for key in self.public_keys.iter() {
            builder = builder.push_key(key);
        }
        builder
            .push_int(self.public_keys.len() as i64)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script()
    }

    pub fn redeem_script(&self) -> Option<ScriptBuf> {
        match self.address_type {
            AddressType::P2sh => Some(self.multisig_script()),
            AddressType::P2shP2wsh => Some(self.multisig_script().to_p2wsh()),
            AddressType::P2wsh => None,
        }
    }

    pub fn witness_script(&self) -> Option<ScriptBuf> {
        self.address_type
            .is_segwit()
            .then(|| self.multisig_script())
    }

    pub fn script_pubkey(&self) -> ScriptBuf {
        match self.address_type {
            AddressType::P2sh => self.multisig_script().to_p2sh(),
            AddressType::P2shP2wsh => self.multisig_script().to_p2wsh().to_p2sh(),
            AddressType::P2wsh => self.multisig_script().to_p2wsh(),
        }
    }

    pub fn address(&self) -> Result<Address, Error> {
        Address::from_script(&self.script_pubkey(), self.network.bitcoin_network())
            .map_err(|e| Error::InvalidMultisig(e.to_string()))
    }
}

fn small_int(op: u8) -> Option<usize> {
    // OP_PUSHNUM_1 ..= OP_PUSHNUM_16
    (0x51..=0x60).contains(&op).then(|| (op - 0x50) as usize)
}

/// Origin of a public key of a multisig, as recorded in a PSBT input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bip32Derivation {
    /// Compressed public key, hex
    pub public_key: String,

    /// Root fingerprint, 8 hex characters
    pub fingerprint: String,

    pub path: String,
}

/// An output locked by a multisig, about to be spent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigInput {
    pub txid: String,
    pub index: u32,
    pub amount_sats: Option<u64>,
    pub multisig: Multisig,

    /// The transaction creating the output, hex. Required to spend P2SH outputs
    pub transaction_hex: Option<String>,

    /// One entry per public key of `multisig` whose origin is known
    pub bip32_derivation: Vec<Bip32Derivation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigOutput {
    pub address: String,
    pub amount_sats: u64,
}

/// Identifies the signer whose signatures are requested from a PSBT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDetails {
    /// Root fingerprint, 8 hex characters
    pub xfp: String,

    /// Path prefix of the signer keys, e.g. `m/45'`
    pub path: String,
}

#[cfg(test)]
mod test {
    use mwk_test_util::*;

    use super::*;

    fn two_of_two(address_type: AddressType) -> Multisig {
        Multisig::new(
            address_type,
            Network::Testnet,
            2,
            &[MULTISIG_PUBKEY_1.to_string(), MULTISIG_PUBKEY_2.to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_p2sh_multisig() {
        let multisig = two_of_two(AddressType::P2sh);
        assert_eq!(
            multisig.multisig_script().to_hex_string(),
            MULTISIG_REDEEM_SCRIPT
        );
        assert_eq!(multisig.address().unwrap().to_string(), MULTISIG_ADDRESS);
        assert!(multisig.witness_script().is_none());
        assert_eq!(multisig.required_signers(), 2);
        assert_eq!(multisig.total_signers(), 2);
        assert_eq!(
            multisig.public_keys(),
            vec![MULTISIG_PUBKEY_1.to_string(), MULTISIG_PUBKEY_2.to_string()]
        );
    }

    #[test]
    fn test_segwit_multisig() {
        let p2wsh = two_of_two(AddressType::P2wsh);
        assert!(p2wsh.redeem_script().is_none());
        assert!(p2wsh.address().unwrap().to_string().starts_with("tb1q"));

        let wrapped = two_of_two(AddressType::P2shP2wsh);
        assert_eq!(wrapped.witness_script(), p2wsh.witness_script());
        assert!(wrapped.address().unwrap().to_string().starts_with('2'));
    }

    #[test]
    fn test_from_script() {
        let script = ScriptBuf::from_hex(MULTISIG_REDEEM_SCRIPT).unwrap();
        let multisig = Multisig::from_script(&script, AddressType::P2sh, Network::Testnet).unwrap();
        assert_eq!(multisig, two_of_two(AddressType::P2sh));

        let p2pkh = ScriptBuf::from_hex("76a91416f06b27427e6981037d04c093bcdf856d27589488ac")
            .unwrap();
        assert!(Multisig::from_script(&p2pkh, AddressType::P2sh, Network::Testnet).is_err());
    }

    #[test]
    fn test_invalid_multisig() {
        let keys = [MULTISIG_PUBKEY_1.to_string()];
        assert!(Multisig::new(AddressType::P2sh, Network::Testnet, 2, &keys).is_err());
        assert!(Multisig::new(AddressType::P2sh, Network::Testnet, 0, &keys).is_err());
        let err = Multisig::new(AddressType::P2sh, Network::Testnet, 1, &["02ab".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid public key \"02ab\"");
    }

    #[test]
    fn test_address_type() {
        for t in [AddressType::P2sh, AddressType::P2shP2wsh, AddressType::P2wsh] {
            assert_eq!(AddressType::from_str(&t.to_string()).unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{t}\""));
        }
        assert_eq!(
            AddressType::from_str("P2SH_P2WSH").unwrap(),
            AddressType::P2shP2wsh
        );
    }
}
