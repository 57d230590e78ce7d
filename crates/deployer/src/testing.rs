//! Fixtures shared by the unit tests.

use {
    crate::compile::CompiledArtifact,
    alloy::{json_abi::JsonAbi, primitives::Bytes},
};

pub const HOTEL_ABI: &str = r#"[
  {
    "type": "constructor",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "_name", "type": "string", "internalType": "string" },
      { "name": "_description", "type": "string", "internalType": "string" },
      { "name": "_latitude", "type": "string", "internalType": "string" },
      { "name": "_longitude", "type": "string", "internalType": "string" },
      { "name": "_utcOffset", "type": "uint256", "internalType": "uint256" }
    ]
  },
  {
    "type": "function",
    "name": "name",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "string", "internalType": "string" }]
  },
  {
    "type": "function",
    "name": "description",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "string", "internalType": "string" }]
  },
  {
    "type": "function",
    "name": "utcOffset",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }]
  },
  {
    "type": "function",
    "name": "roomCount",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }]
  },
  {
    "type": "function",
    "name": "rooms",
    "stateMutability": "view",
    "inputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
    "outputs": [
      { "name": "roomType", "type": "string", "internalType": "string" },
      { "name": "description", "type": "string", "internalType": "string" },
      { "name": "capacity", "type": "uint256", "internalType": "uint256" },
      { "name": "rate", "type": "uint256", "internalType": "uint256" },
      { "name": "available", "type": "bool", "internalType": "bool" }
    ]
  },
  {
    "type": "function",
    "name": "addRoom",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "_roomType", "type": "string", "internalType": "string" },
      { "name": "_description", "type": "string", "internalType": "string" },
      { "name": "_capacity", "type": "uint256", "internalType": "uint256" },
      { "name": "_rate", "type": "uint256", "internalType": "uint256" },
      { "name": "_available", "type": "bool", "internalType": "bool" }
    ],
    "outputs": []
  }
]"#;

pub fn hotel_abi() -> JsonAbi {
    serde_json::from_str(HOTEL_ABI).unwrap()
}

pub fn hotel_artifact() -> CompiledArtifact {
    CompiledArtifact {
        name: "Hotel".to_string(),
        bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
        abi: hotel_abi(),
    }
}

pub fn hotel_args() -> Vec<String> {
    [
        "Ethereum Hotel",
        "Book rooms with ease",
        "12.9716",
        "77.5946",
        "19800",
    ]
    .map(String::from)
    .to_vec()
}
