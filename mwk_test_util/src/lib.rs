//! Fixtures shared by the tests of the workspace.
//!
//! Keys are derived from [`TEST_MNEMONIC`], a publicly known mnemonic that must never hold funds.

use serde_json::{json, Value};

pub const TEST_MNEMONIC: &str = "merge alley lucky axis penalty manage latin gasp virus captain wheel deal chase fragile chapter boss zero dirt stadium tooth physical valve kid plunge";

/// Root fingerprint of [`TEST_MNEMONIC`]
pub const ROOT_FINGERPRINT: &str = "f57ec65d";

// Keys at the Coldcard chroots, as exported by the device

pub const TESTNET_P2SH_XPUB: &str = "tpubDA4nUAdTmYwqJEETnxhH5HyN817oXugoa63GmThiDVNDKGf4uaG6QAk9BUo7RdXv1LFF7yBognGFPWzdwXY4XWMHyJ5mtZaVFEU5MtMfj7H";
pub const TESTNET_P2SH_P2WSH_XPUB: &str = "Upub5THcsrK1mzKPEWiosEaR5Ra5sSLTfgfc2RBqxDWZt9jFrANXFzeKSpjxn7StBgBhBe1YPiZXurj7XrQhggqYV63ZzpWUp27gWiL2wDoVwaW";
pub const TESTNET_P2WSH_XPUB: &str = "Vpub5n7tBWyvvfrs8rgaiWz4sJb6X1KrQGwj3VAD9MzDLRg419Pee4DVGzCzkdxB2U5tQor3bjDia2hU9VSamFF8714rJJb7TzyeSKtZ5PQ1MRN";
pub const MAINNET_P2SH_XPUB: &str = "xpub69h9wvon4GzP2S3cLmiBsNdznt29YXBk2TSyQueZsacKZyzMqMR1Fj5JwSiKu8agDRiLWPfw9gSChLW2Yfgpe4tzuhLUD2vFfGsfbtTA3r7";
pub const MAINNET_P2SH_P2WSH_XPUB: &str = "Ypub6jGfy3TmqjoeWQhS5wBPw4xZeFubMPzPhZZVBn72J2G6xD6Z1GkbR3be51yknKt4ahighwfwSMAgX9QFUWTxy7pKhzTaLY37EPxBEctgBCs";
pub const MAINNET_P2WSH_XPUB: &str = "Zpub746wGi8gzRM8Qjb7dLXmKrW9KDTP4FmGTMJ3DWc5PwvNcGyq3tBhnsXjcDAL5jXoRHMULRmB5CGb42Q8adsoKRbEh2qw1MT56vRxEG4QTvd";

/// [`TESTNET_P2SH_XPUB`] with the `Upub` prefix
pub const TESTNET_P2SH_UPUB: &str = "Upub5N6TAAXUBBvJu7ddnMpJ5BhHzmd4w1tqbPXyyzET7LK62s7aqnJbUexpgXo3TqqpDyRu8YtNeum4AeH6gobjPqxs99Mbrhvnjpxc23UAv1V";
/// [`TESTNET_P2WSH_XPUB`] with the `tpub` prefix
pub const TESTNET_P2WSH_TPUB: &str = "tpubDFFxBrR1NMLugg6Htm5RfKmfUGg94YkC759H9SZb4aMJET7uTC1RaSLBENzezM84nXYaqfvb9Er7V5YZJGmSSRmgG7cruworg1LP2gE9uLg";
/// [`TESTNET_P2SH_P2WSH_XPUB`] with the `tpub` prefix
pub const TESTNET_P2SH_P2WSH_TPUB: &str = "tpubDFFxBrR1NMLuddKdsqTQ5Xr9zfqCGaTa17h8jgypzJnP8Zv1KnbpNLXHH4Sx9TsnxzptP8rxwjEJkj8EwQmsckRzpyEeqsmP27qWH2bftWp";
/// [`MAINNET_P2WSH_XPUB`] with the `xpub` prefix
pub const MAINNET_P2WSH_XPUB_CONVERTED: &str = "xpub6DYKY94R86hoHa3W1xVY5byLFV8Dxf6gJrbvjTYmGALCstnTnAUJTdMXm6HgXV14NY3sxtZwGfAzAHZEr1tpaU7N7tLgS8M6fk2nsCiPNye";

/// Compressed public key at `m/45'`
pub const P2SH_ROOT_PUBKEY: &str =
    "03c060f4c111a276807fc3a88966cc1d3a683eef9226a034ee2cd6982b478fa8e2";

/// A key derived below a chroot: (path, testnet xpub, mainnet xpub, compressed public key)
pub struct DerivedKey {
    pub path: &'static str,
    pub tpub: &'static str,
    pub xpub: Option<&'static str>,
    pub public_key: &'static str,
}

pub const DERIVED_KEYS: &[DerivedKey] = &[
    DerivedKey {
        path: "m/45'/0",
        tpub: "tpubDBAj15fFkLimiBmDqapikSS4qkmvAS8LijMey9S9fAyjq65ERgjuzaa6GonVQXugcrBzfpEoH6SPBzevfowZgYJ3apWcHbMPaNJnBRkbsRY",
        xpub: Some("xpub6Ao6Uqqa34mKSPaNPPqdYX6hWdgGB3dHB6mMcbP1KGDr5oQXMTtpr8uG2mhht2xSpwf64EivjzcLVpAKGx6Ko6qkXDmJc4h9zQiNRS5g9Cu"),
        public_key: "02b04ac39b566b7353b5bf8e164be83bf90b090e7516170e88a8cb6c88a860f0a3",
    },
    DerivedKey {
        path: "m/45'/0/0",
        tpub: "tpubDDEtut1QNkoJJgB9E1EzaUSux9fSJHMCdNydFZ6Uo3rTfk9bmeiekMTXt1WbanhdvwokTgedjF9H3gFtMU7LUgsN23na1MQsUeRFtPyiBZo",
        xpub: None,
        public_key: "028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d",
    },
    DerivedKey {
        path: "m/45'/1/0",
        tpub: "tpubDDhFRuipvJKBgPBDFooShZNtnkLwMkGDZXA1KBUd8xruQ8AA4QdZaiQYWj1hDpDW8r7va9D7GHeEp5ZzMsj5uDRX4s3hk4eQgJm8jMAqkLC",
        xpub: None,
        public_key: "036b5cfe4b7f29cb36e5261ad74f8a4f8602f77628e8d9d120f5580d3ccafaef74",
    },
    DerivedKey {
        path: "m/48'/1'/0'/1'/0",
        tpub: "tpubDHTxG7LUjuUCtrBBhY5jagk9Y3t9C3VAaitxZZ99ocy22vZphLoweQSf2C2wd3enNSUwdKgaMeZN7wMqCqiMbbdbR7YrjGcjojgDFhLEDUq",
        xpub: None,
        public_key: "0352d9848a6487401b7ee46c59d14621b7300500f0e1d31fde66433d1fc4b80671",
    },
    DerivedKey {
        path: "m/48'/1'/0'/2'/0",
        tpub: "tpubDHYS4BvomwxQVnpvA3FddjoK2StncpjMnoxTadhYZoTFM6XpmXReVj1G3M2rDZudXW2zhWd8qMv2nC9FBtrKWsUVv3KXA4r9NXwffKcyNT8",
        xpub: None,
        public_key: "021ee9ee80a32ec8552168a8989728cf2892c6527a338be698374138e634336864",
    },
    DerivedKey {
        path: "m/48'/1'/0'/2'/0/0",
        tpub: "tpubDKVKJjFQrticLSSf77TWYmvFq6XTALifW1shoo4snhfh7YGhMHcsCB2WwvfAbQGQDJy8EwuD6kjfvYPqSxJptSKqZDvzxQFcpYy88iS85kd",
        xpub: None,
        public_key: "03ecf349ecf63fcd0ece9de7eb1abfb8f8b243fecc443bd62ef47744f0f6b7eef6",
    },
    DerivedKey {
        path: "m/48'/0'/0'/2'/0/0",
        tpub: "",
        xpub: Some("xpub6HhVXB8gzsLYLJy4Pxuu11Y4rUAUtDXQnZbXcxrtzNpZ7ntBAktZpTZzFaCrvFn1XrucaDkUNtH9egec92nWMjcTV8CSNtcHdqPaoxYEXse"),
        public_key: "032817ba5e2b76f6e2fab1d985224516f2b77a9c181e210def81ec2be8e17007c9",
    },
];

/// Install a subscriber printing the logs selected by `RUST_LOG`, once per test binary
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn derived_key(path: &str) -> &'static DerivedKey {
    DERIVED_KEYS
        .iter()
        .find(|k| k.path == path)
        .unwrap_or_else(|| panic!("no fixture for {path}"))
}

/// Mainnet key at `m/45'/0'/0'/0'`, depth 4, parent fingerprint [`DEEP_XPUB_PARENT_FINGERPRINT`]
pub const DEEP_XPUB: &str = "xpub6EW9kGJYgPmEi8JNHLUCcHgcxRMZmiPPXrKAej3xdCsLj3otQtKjNVcfRRtAwUVR1d5MiyeDMUP1XAHxu1uHSNiPDzDspLCRZRefe36fiCs";
pub const DEEP_XPUB_PUBLIC_KEY: &str =
    "032247fcfd7932431421578e47cb4b8b8de75fbe1034914422525da01f774363cf";
pub const DEEP_XPUB_PARENT_FINGERPRINT: &str = "83f08c3f";

/// Coldcard "Export XPUB" file for testnet, current firmware naming
pub fn coldcard_testnet_export() -> Value {
    json!({
        "p2sh_deriv": "m/45'",
        "p2sh": TESTNET_P2SH_XPUB,
        "p2sh_p2wsh_deriv": "m/48'/1'/0'/1'",
        "p2sh_p2wsh": TESTNET_P2SH_P2WSH_XPUB,
        "p2wsh_deriv": "m/48'/1'/0'/2'",
        "p2wsh": TESTNET_P2WSH_XPUB,
        "account": "0",
        "xfp": "F57EC65D"
    })
}

/// Coldcard "Export XPUB" file for testnet, firmware before 3.2.0
pub fn coldcard_testnet_export_legacy() -> Value {
    json!({
        "p2sh_deriv": "m/45'",
        "p2sh": TESTNET_P2SH_XPUB,
        "p2wsh_p2sh_deriv": "m/48'/1'/0'/1'",
        "p2wsh_p2sh": TESTNET_P2SH_P2WSH_XPUB,
        "p2wsh_deriv": "m/48'/1'/0'/2'",
        "p2wsh": TESTNET_P2WSH_XPUB,
        "xfp": "F57EC65D"
    })
}

/// Coldcard "Export XPUB" file for mainnet
pub fn coldcard_mainnet_export() -> Value {
    json!({
        "p2sh_deriv": "m/45'",
        "p2sh": MAINNET_P2SH_XPUB,
        "p2sh_p2wsh_deriv": "m/48'/0'/0'/1'",
        "p2sh_p2wsh": MAINNET_P2SH_P2WSH_XPUB,
        "p2wsh_deriv": "m/48'/0'/0'/2'",
        "p2wsh": MAINNET_P2WSH_XPUB,
        "account": "0",
        "xfp": "F57EC65D"
    })
}

// A 2-of-2 testnet P2SH multisig between `f57ec65d` at m/45'/0/0 and `d55d56a6` at m/45'/0/0,
// funded with 100000 sats and spent to `DESTINATION_ADDRESS` for 90000 sats.

pub const MULTISIG_PUBKEY_1: &str =
    "028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d";
pub const MULTISIG_PUBKEY_2: &str =
    "0247f7e1142df119085553dc8426cb376160f699b3d9d6bce15bfebae9fb7112bb";
pub const SECOND_SIGNER_FINGERPRINT: &str = "d55d56a6";
pub const MULTISIG_REDEEM_SCRIPT: &str = "5221028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d210247f7e1142df119085553dc8426cb376160f699b3d9d6bce15bfebae9fb7112bb52ae";
pub const MULTISIG_ADDRESS: &str = "2NCkBWhbx1Cx6LQ4thLs91p3eATMRK9eg7R";
pub const MULTISIG_SIGNING_PATH: &str = "m/45'/0/0";
pub const FUNDING_TXID: &str = "79b3edf783e10cfce362b089c73675867171ca435aaf93ffc2c44455cbd2dcf2";
/// The transaction funding [`MULTISIG_ADDRESS`] with [`FUNDING_AMOUNT`], as found in [`UNSIGNED_PSBT`]
pub const FUNDING_TX_HEX: &str = "020000000111111111111111111111111111111111111111111111111111111111111111110000000000ffffffff01a08601000000000017a914d5e462e3572fc0fdeac7d219dc3126731c2f450f8700000000";
pub const FUNDING_AMOUNT: u64 = 100_000;
pub const DESTINATION_ADDRESS: &str = "mhcFArD55CNY7qpHb5FT4waUYaqmmrGCVL";
pub const DESTINATION_AMOUNT: u64 = 90_000;

/// Testnet P2PKH address of [`MULTISIG_PUBKEY_1`]
pub const PUBKEY_1_TESTNET_P2PKH: &str = "mymA8SUPcxxfecKxRGrhBM6yCWQU6MAcrJ";

pub const UNSIGNED_PSBT: &str = "cHNidP8BAFUCAAAAAfLc0stVRMTC/5OvWkPKcXGGdTbHibBi4/wM4YP37bN5AAAAAAD9////AZBfAQAAAAAAGXapFBbwaydCfmmBA30EwJO834VtJ1iUiKwAAAAAAAEAUwIAAAABEREREREREREREREREREREREREREREREREREREREREREAAAAAAP////8BoIYBAAAAAAAXqRTV5GLjVy/A/erH0hncMSZzHC9FD4cAAAAAAQRHUiECjyZcR5HSTd1OZ4kIno8ErMGmPyr3iP+GxND//ZM60z0hAkf34RQt8RkIVVPchCbLN2Fg9pmz2da84Vv+uun7cRK7Uq4iBgJH9+EULfEZCFVT3IQmyzdhYPaZs9nWvOFb/rrp+3ESuxDVXVamLQAAgAAAAAAAAAAAIgYCjyZcR5HSTd1OZ4kIno8ErMGmPyr3iP+GxND//ZM60z0Q9X7GXS0AAIAAAAAAAAAAAAAA";

/// [`UNSIGNED_PSBT`] with the signature of [`MULTISIG_PUBKEY_1`]
pub const SIGNED_PSBT: &str = "cHNidP8BAFUCAAAAAfLc0stVRMTC/5OvWkPKcXGGdTbHibBi4/wM4YP37bN5AAAAAAD9////AZBfAQAAAAAAGXapFBbwaydCfmmBA30EwJO834VtJ1iUiKwAAAAAAAEAUwIAAAABEREREREREREREREREREREREREREREREREREREREREREAAAAAAP////8BoIYBAAAAAAAXqRTV5GLjVy/A/erH0hncMSZzHC9FD4cAAAAAIgICjyZcR5HSTd1OZ4kIno8ErMGmPyr3iP+GxND//ZM60z1HMEQCIHjoJ4ODycPTLnLqeYtTDTNoHHwK5f5oCwk34W3n4dRrAiBfopYIDpG5G6so/gVHglsEtqN80Rg/nUObm9QDi2WNPAEBBEdSIQKPJlxHkdJN3U5niQiejwSswaY/KveI/4bE0P/9kzrTPSECR/fhFC3xGQhVU9yEJss3YWD2mbPZ1rzhW/666ftxErtSriIGAkf34RQt8RkIVVPchCbLN2Fg9pmz2da84Vv+uun7cRK7ENVdVqYtAACAAAAAAAAAAAAiBgKPJlxHkdJN3U5niQiejwSswaY/KveI/4bE0P/9kzrTPRD1fsZdLQAAgAAAAAAAAAAAAAA=";

/// [`SIGNED_PSBT`] hex encoded
pub const SIGNED_PSBT_HEX: &str = "70736274ff0100550200000001f2dcd2cb5544c4c2ff93af5a43ca7171867536c789b062e3fc0ce183f7edb3790000000000fdffffff01905f0100000000001976a91416f06b27427e6981037d04c093bcdf856d27589488ac0000000000010053020000000111111111111111111111111111111111111111111111111111111111111111110000000000ffffffff01a08601000000000017a914d5e462e3572fc0fdeac7d219dc3126731c2f450f87000000002202028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d473044022078e8278383c9c3d32e72ea798b530d33681c7c0ae5fe680b0937e16de7e1d46b02205fa296080e91b91bab28fe0547825b04b6a37cd1183f9d439b9bd4038b658d3c010104475221028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d210247f7e1142df119085553dc8426cb376160f699b3d9d6bce15bfebae9fb7112bb52ae22060247f7e1142df119085553dc8426cb376160f699b3d9d6bce15bfebae9fb7112bb10d55d56a62d00008000000000000000002206028f265c4791d24ddd4e6789089e8f04acc1a63f2af788ff86c4d0fffd933ad33d10f57ec65d2d00008000000000000000000000";

/// Signature of [`MULTISIG_PUBKEY_1`] in [`SIGNED_PSBT`], with the SIGHASH_ALL byte
pub const SIGNATURE: &str = "3044022078e8278383c9c3d32e72ea798b530d33681c7c0ae5fe680b0937e16de7e1d46b02205fa296080e91b91bab28fe0547825b04b6a37cd1183f9d439b9bd4038b658d3c01";

/// [`SIGNATURE`] without the SIGHASH_ALL byte, as returned by some devices
pub const SIGNATURE_NO_SIGHASH: &str = "3044022078e8278383c9c3d32e72ea798b530d33681c7c0ae5fe680b0937e16de7e1d46b02205fa296080e91b91bab28fe0547825b04b6a37cd1183f9d439b9bd4038b658d3c";

/// UR parts encoding the bytes of [`UNSIGNED_PSBT`]
pub const UNSIGNED_PSBT_UR_PARTS: [&str; 3] = [
    "UR:BYTES/1OF3/PN3MWNTS9LT6JJGJ7H2K9LL7360XQF2KS3LUPY60UYCMN5QAGYXQFWN0NR/TYQKSURNVF607QGQ25PQQQQQQ8EDE5KT24ZVFSHLJWH45S72W9CCVAFKC7YMQCHRLSXWRQLHAKEHJQQQQQQQPL0LLLLSRYZLQYQQQQQQQQVHD2G5ZMCXKF6Z0E5CZQMAQNQF80XLS4KJWKY53ZKQQQQQQQQQZQZNQGQQQQQPZYG3ZYG3ZYG3ZYG3ZYG3ZYG3ZYG3ZYG3",
    "UR:BYTES/2OF3/PN3MWNTS9LT6JJGJ7H2K9LL7360XQF2KS3LUPY60UYCMN5QAGYXQFWN0NR/ZYG3ZYG3ZYG3ZYG3ZYGSQQQQQQQ0LLLLLUQ6PPSPQQQQQQQQZ753F40YVT34WT7QLH4V05SEMSCJVUCU9AZSLPCQQQQQQQGYGAFZZQ50YEWY0YWJFHW5UEUFPZ0G7P9VCXNR72HH3RLCD3XSLL7EXWKN85SSY3LHUY2ZMUGEPP248HYYYM9NWCTQ76VM8KWKHNS4HL46",
    "UR:BYTES/3OF3/PN3MWNTS9LT6JJGJ7H2K9LL7360XQF2KS3LUPY60UYCMN5QAGYXQFWN0NR/A8AHZY4M22HZYPSZGLM7Z9PD7YVSS42NMJZZDJEHV9S0DXDNM8TTEC2ML6AWN7M3Z2A3P42A26NZ6QQQSQQQQQQQQQQQQQPZQCPG7FJUG7GAYNWAFENCJZY73UZ2ESDX8U400Z8LSMZDPLLAJVADX0GS74LVVHFDQQQGQQQQQQQQQQQQQQQQQ28WA5Q",
];
