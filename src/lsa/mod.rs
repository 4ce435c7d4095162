use std::net;

use bytes::{Buf, Bytes};

use network::NetworkLsa;
use router::RouterLsa;

pub mod network;
pub mod router;

pub const HEADER_LENGTH: usize = 20;

/// LS type tags the daemon keeps in its database.
/// Only router and network bodies have a decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LsaType {
    Router = 1,
    Network = 2,
    SummaryNetwork = 3,
    SummaryAsbr = 4,
    AsExternal = 5,
    GroupMembership = 6,
    NssaExternal = 7,
    ExternalAttributes = 8,
    OpaqueLink = 9,
    OpaqueArea = 10,
    OpaqueAs = 11,
}

impl LsaType {
    pub const ALL: [LsaType; 11] = [
        LsaType::Router,
        LsaType::Network,
        LsaType::SummaryNetwork,
        LsaType::SummaryAsbr,
        LsaType::AsExternal,
        LsaType::GroupMembership,
        LsaType::NssaExternal,
        LsaType::ExternalAttributes,
        LsaType::OpaqueLink,
        LsaType::OpaqueArea,
        LsaType::OpaqueAs,
    ];

    pub fn from_u8(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|lsa_type| lsa_type.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for LsaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LsaType::Router => "router",
            LsaType::Network => "network",
            LsaType::SummaryNetwork => "summary-network",
            LsaType::SummaryAsbr => "summary-asbr",
            LsaType::AsExternal => "as-external",
            LsaType::GroupMembership => "group-membership",
            LsaType::NssaExternal => "nssa-external",
            LsaType::ExternalAttributes => "external-attributes",
            LsaType::OpaqueLink => "opaque-link",
            LsaType::OpaqueArea => "opaque-area",
            LsaType::OpaqueAs => "opaque-as",
        };
        write!(f, "{}", name)
    }
}

/// A record that failed structural validation. It is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedRecord {
    BufferTooShort(usize),
    InvalidLength { declared: u16, available: usize },
    UnknownType(u8),
    BodyTooLong(usize),
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedRecord::BufferTooShort(len) => {
                write!(f, "buffer too short for an LSA header: {} bytes", len)
            }
            MalformedRecord::InvalidLength {
                declared,
                available,
            } => write!(
                f,
                "invalid LSA length: declared {}, {} bytes available",
                declared, available
            ),
            MalformedRecord::UnknownType(code) => write!(f, "unknown LSA type: {}", code),
            MalformedRecord::BodyTooLong(len) => {
                write!(f, "LSA body does not fit the length field: {} bytes", len)
            }
        }
    }
}

impl std::error::Error for MalformedRecord {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub age: u16,
    pub options: u8,
    pub lsa_type: LsaType,
    pub link_state_id: net::Ipv4Addr,
    pub advertising_router: net::Ipv4Addr,
    pub sequence_number: u32,
    pub checksum: u16,
    pub length: u16,
}

impl Header {
    /// Parses the fixed header and checks the declared length against the
    /// bytes actually available.
    pub fn try_from_be_bytes(data: &[u8]) -> Result<Self, MalformedRecord> {
        if data.len() < HEADER_LENGTH {
            return Err(MalformedRecord::BufferTooShort(data.len()));
        }
        let mut buf = &data[..HEADER_LENGTH];
        let age = buf.get_u16();
        let options = buf.get_u8();
        let type_code = buf.get_u8();
        let link_state_id = net::Ipv4Addr::from(buf.get_u32());
        let advertising_router = net::Ipv4Addr::from(buf.get_u32());
        let sequence_number = buf.get_u32();
        let checksum = buf.get_u16();
        let length = buf.get_u16();

        if (length as usize) < HEADER_LENGTH || length as usize > data.len() {
            return Err(MalformedRecord::InvalidLength {
                declared: length,
                available: data.len(),
            });
        }
        let lsa_type =
            LsaType::from_u8(type_code).ok_or(MalformedRecord::UnknownType(type_code))?;

        Ok(Self {
            age,
            options,
            lsa_type,
            link_state_id,
            advertising_router,
            sequence_number,
            checksum,
            length,
        })
    }

    pub fn to_be_bytes(&self) -> [u8; HEADER_LENGTH] {
        let mut bytes = [0; HEADER_LENGTH];
        bytes[0..2].copy_from_slice(&self.age.to_be_bytes());
        bytes[2] = self.options;
        bytes[3] = self.lsa_type.code();
        bytes[4..8].copy_from_slice(&self.link_state_id.octets());
        bytes[8..12].copy_from_slice(&self.advertising_router.octets());
        bytes[12..16].copy_from_slice(&self.sequence_number.to_be_bytes());
        bytes[16..18].copy_from_slice(&self.checksum.to_be_bytes());
        bytes[18..20].copy_from_slice(&self.length.to_be_bytes());
        bytes
    }
}

/// One received LSA: the parsed header plus its own copy of the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lsa {
    pub header: Header,
    pub body: Bytes,
}

impl Lsa {
    /// Builds a fresh record around `body`; age, options, sequence number
    /// and checksum are left zero.
    pub fn new(
        lsa_type: LsaType,
        link_state_id: net::Ipv4Addr,
        advertising_router: net::Ipv4Addr,
        body: Bytes,
    ) -> Result<Self, MalformedRecord> {
        let length = u16::try_from(HEADER_LENGTH + body.len())
            .map_err(|_| MalformedRecord::BodyTooLong(body.len()))?;
        let header = Header {
            age: 0,
            options: 0,
            lsa_type,
            link_state_id,
            advertising_router,
            sequence_number: 0,
            checksum: 0,
            length,
        };
        Ok(Self { header, body })
    }

    /// Validates and copies one LSA out of `data`. Bytes past the declared
    /// length are not part of the record.
    pub fn try_from_be_bytes(data: &[u8]) -> Result<Self, MalformedRecord> {
        let header = Header::try_from_be_bytes(data)?;
        let body = Bytes::copy_from_slice(&data[HEADER_LENGTH..header.length as usize]);
        Ok(Self { header, body })
    }

    pub fn lsa_type(&self) -> LsaType {
        self.header.lsa_type
    }

    pub fn decode_body(&self) -> LsaBody {
        LsaBody::decode(self.header.lsa_type, &self.body)
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LENGTH + self.body.len());
        bytes.extend_from_slice(&self.header.to_be_bytes());
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Interprets the body of one LSA type.
pub trait BodyDecoder: Sized {
    const LSA_TYPE: LsaType;

    fn decode(body: &[u8]) -> Self;
}

/// Decoded view of an LSA body, selected by the type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LsaBody {
    Router(RouterLsa),
    Network(NetworkLsa),
    Unsupported(LsaType),
}

impl LsaBody {
    pub fn decode(lsa_type: LsaType, body: &[u8]) -> Self {
        match lsa_type {
            RouterLsa::LSA_TYPE => LsaBody::Router(RouterLsa::decode(body)),
            NetworkLsa::LSA_TYPE => LsaBody::Network(NetworkLsa::decode(body)),
            other => LsaBody::Unsupported(other),
        }
    }
}
