//! Instruction payload encoding for the MU$IK program.
//!
//! Wire layout (must match the program's borsh decoding exactly):
//!
//! ```text
//! [0]     operation discriminant (u8)
//! [1..]   fields in schema order:
//!           text   -> [len: u32 LE][UTF-8 bytes]
//!           pubkey -> [32 bytes]
//! ```
//!
//! The payload length is computed before anything is written, so the buffer
//! is allocated once at its exact size.

use std::fmt;

use solana_pubkey::Pubkey;

use crate::error::{SdkError, SdkResult};
use crate::program::constants::{DISCRIMINANT_SIZE, LENGTH_PREFIX_SIZE, PUBKEY_SIZE};

// ============================================================================
// Operations
// ============================================================================

/// Operations understood by the MU$IK program.
///
/// The discriminant mapping lives here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create the asset record (title, artist, content hash, certificate hash)
    Initialize,
    /// Mark the asset as minted
    Mint,
    /// Register the copyright claim on a minted asset
    RegisterCopyright,
    /// Hand the asset to a new owner
    TransferOwnership,
}

impl Operation {
    /// Every operation, in discriminant order.
    pub const ALL: [Operation; 4] = [
        Operation::Initialize,
        Operation::Mint,
        Operation::RegisterCopyright,
        Operation::TransferOwnership,
    ];

    /// Single-byte discriminant written at offset 0.
    pub const fn discriminant(self) -> u8 {
        match self {
            Operation::Initialize => 0,
            Operation::Mint => 1,
            Operation::RegisterCopyright => 2,
            Operation::TransferOwnership => 3,
        }
    }

    /// Human-readable operation name.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Initialize => "Initialize",
            Operation::Mint => "Mint",
            Operation::RegisterCopyright => "RegisterCopyright",
            Operation::TransferOwnership => "TransferOwnership",
        }
    }

    /// Declared field schema, in wire order.
    pub const fn schema(self) -> &'static [FieldSpec] {
        match self {
            Operation::Initialize => INITIALIZE_SCHEMA,
            Operation::Mint | Operation::RegisterCopyright => &[],
            Operation::TransferOwnership => TRANSFER_OWNERSHIP_SCHEMA,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Operation::ALL
            .into_iter()
            .find(|op| op.discriminant() == value)
            .ok_or_else(|| {
                SdkError::InvalidInstructionData(format!("unknown discriminant {}", value))
            })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Schemas
// ============================================================================

/// Encoding of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// u32 LE length prefix + UTF-8 bytes
    Text,
    /// 32 raw bytes
    Pubkey,
}

/// One entry of an operation's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text,
    }
}

const INITIALIZE_SCHEMA: &[FieldSpec] = &[
    text("title"),
    text("artist"),
    text("content_hash"),
    text("certificate_hash"),
];

const TRANSFER_OWNERSHIP_SCHEMA: &[FieldSpec] = &[FieldSpec {
    name: "new_owner",
    kind: FieldKind::Pubkey,
}];

/// A field value ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Pubkey(Pubkey),
}

impl FieldValue {
    /// The kind this value encodes as.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Pubkey(_) => FieldKind::Pubkey,
        }
    }

    /// Borrow the text, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Pubkey(_) => None,
        }
    }

    /// Number of bytes this field occupies on the wire.
    fn wire_len(&self) -> Option<usize> {
        match self {
            FieldValue::Text(s) => LENGTH_PREFIX_SIZE.checked_add(s.len()),
            FieldValue::Pubkey(_) => Some(PUBKEY_SIZE),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Pubkey> for FieldValue {
    fn from(value: Pubkey) -> Self {
        FieldValue::Pubkey(value)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a byte length as the 4-byte little-endian prefix.
///
/// Fails with `EncodingOverflow` when `len` does not fit in a `u32`.
pub fn length_prefix(field: &str, len: usize) -> SdkResult<[u8; LENGTH_PREFIX_SIZE]> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| SdkError::EncodingOverflow {
            field: field.to_string(),
            len,
        })
}

fn check_schema(operation: Operation, fields: &[FieldValue]) -> SdkResult<()> {
    let schema = operation.schema();
    if schema.len() != fields.len() {
        return Err(SdkError::SchemaMismatch {
            operation: operation.name(),
            reason: format!("expected {} fields, got {}", schema.len(), fields.len()),
        });
    }

    for (spec, value) in schema.iter().zip(fields) {
        if spec.kind != value.kind() {
            return Err(SdkError::SchemaMismatch {
                operation: operation.name(),
                reason: format!(
                    "field `{}` expects {:?}, got {:?}",
                    spec.name,
                    spec.kind,
                    value.kind()
                ),
            });
        }
    }
    Ok(())
}

/// Exact payload length for `operation` with `fields`.
///
/// Always `1 + Σ(4 + len(text_i)) + 32 * pubkeys`.
pub fn encoded_len(operation: Operation, fields: &[FieldValue]) -> SdkResult<usize> {
    check_schema(operation, fields)?;

    let mut total = DISCRIMINANT_SIZE;
    for (spec, value) in operation.schema().iter().zip(fields) {
        if let FieldValue::Text(s) = value {
            // Reject lengths the prefix can't carry before summing
            length_prefix(spec.name, s.len())?;
        }
        total = value
            .wire_len()
            .and_then(|len| total.checked_add(len))
            .ok_or_else(|| SdkError::EncodingOverflow {
                field: spec.name.to_string(),
                len: usize::MAX,
            })?;
    }
    Ok(total)
}

/// Encode an instruction payload.
pub fn encode(operation: Operation, fields: &[FieldValue]) -> SdkResult<Vec<u8>> {
    let len = encoded_len(operation, fields)?;

    let mut data = Vec::with_capacity(len);
    data.push(operation.discriminant());
    for (spec, value) in operation.schema().iter().zip(fields) {
        match value {
            FieldValue::Text(s) => {
                data.extend_from_slice(&length_prefix(spec.name, s.len())?);
                data.extend_from_slice(s.as_bytes());
            }
            FieldValue::Pubkey(key) => data.extend_from_slice(key.as_ref()),
        }
    }

    debug_assert_eq!(data.len(), len);
    Ok(data)
}

/// Encode an operation whose schema is text-only.
pub fn encode_text(operation: Operation, fields: &[&str]) -> SdkResult<Vec<u8>> {
    let values: Vec<FieldValue> = fields.iter().map(|s| FieldValue::from(*s)).collect();
    encode(operation, &values)
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode an instruction payload back into its operation and fields.
///
/// Strict inverse of [`encode`]: unknown discriminants, truncated fields,
/// invalid UTF-8 and trailing bytes are all rejected.
pub fn decode(data: &[u8]) -> SdkResult<(Operation, Vec<FieldValue>)> {
    let invalid = |e: SdkError| SdkError::InvalidInstructionData(e.to_string());

    let mut reader = ByteReader::new(data);
    let operation = Operation::try_from(reader.read_u8().map_err(invalid)?)?;

    let mut fields = Vec::with_capacity(operation.schema().len());
    for spec in operation.schema() {
        let value = match spec.kind {
            FieldKind::Text => FieldValue::Text(reader.read_string().map_err(invalid)?),
            FieldKind::Pubkey => FieldValue::Pubkey(reader.read_pubkey().map_err(invalid)?),
        };
        fields.push(value);
    }

    if reader.remaining() != 0 {
        return Err(SdkError::InvalidInstructionData(format!(
            "{} trailing bytes after {}",
            reader.remaining(),
            operation
        )));
    }

    Ok((operation, fields))
}

/// Sequential little-endian reader over borsh-style data.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, n: usize) -> SdkResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(SdkError::InvalidDataLength {
                expected: self.offset.saturating_add(n),
                actual: self.data.len(),
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> SdkResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    pub(crate) fn read_u8(&mut self) -> SdkResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_bool(&mut self) -> SdkResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SdkError::Serialization(format!("invalid bool byte {}", other))),
        }
    }

    pub(crate) fn read_u32(&mut self) -> SdkResult<u32> {
        Ok(u32::from_le_bytes(self.take_array::<4>()?))
    }

    pub(crate) fn read_i64(&mut self) -> SdkResult<i64> {
        Ok(i64::from_le_bytes(self.take_array::<8>()?))
    }

    pub(crate) fn read_pubkey(&mut self) -> SdkResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.take_array::<32>()?))
    }

    pub(crate) fn read_string(&mut self) -> SdkResult<String> {
        let len = usize::try_from(self.read_u32()?)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| SdkError::Serialization(e.to_string()))
    }
}
