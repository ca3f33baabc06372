//! Serialization and deserialization utilities for group elements and scalars.
//!
//! Group elements use their canonical `GroupEncoding`; scalars are written
//! big-endian, i.e. the reversed little-endian `PrimeField` representation.
//! Readers consume bytes from the front of a `&mut &[u8]` cursor.

use ff::PrimeField;
use group::GroupEncoding;

use crate::errors::Error;

/// Serialized length of a group element in bytes.
pub fn element_len<G: GroupEncoding>() -> usize {
    G::Repr::default().as_ref().len()
}

/// Serialized length of a scalar in bytes.
pub fn scalar_len<F: PrimeField>() -> usize {
    F::Repr::default().as_ref().len()
}

/// Appends the canonical encoding of `element`.
pub fn write_element<G: GroupEncoding>(out: &mut Vec<u8>, element: &G) {
    out.extend_from_slice(element.to_bytes().as_ref());
}

/// Concatenates the encodings of `elements`.
pub fn serialize_elements<'a, G: GroupEncoding + 'a>(
    elements: impl IntoIterator<Item = &'a G>,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    for element in elements {
        write_element(&mut bytes, element);
    }
    bytes
}

/// Appends `scalar` in big-endian order.
pub fn write_scalar<F: PrimeField>(out: &mut Vec<u8>, scalar: &F) {
    let repr = scalar.to_repr();
    out.extend(repr.as_ref().iter().rev());
}

pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Appends a length as a big-endian `u32`.
///
/// Lengths in this crate count terms, children or bytes of labels and stay far below `u32::MAX`.
pub fn write_len(out: &mut Vec<u8>, len: usize) {
    write_u32(out, len as u32);
}

/// Appends `bytes` prefixed with their length.
pub fn write_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    write_len(out, bytes.len());
    out.extend_from_slice(bytes);
}

/// Splits `n` bytes off the front of `data`.
pub fn take<'a>(data: &mut &'a [u8], n: usize) -> Result<&'a [u8], Error> {
    if data.len() < n {
        return Err(Error::Deserialization(format!(
            "expected {n} bytes, {} left",
            data.len()
        )));
    }
    let (head, tail) = data.split_at(n);
    *data = tail;
    Ok(head)
}

pub fn read_u8(data: &mut &[u8]) -> Result<u8, Error> {
    Ok(take(data, 1)?[0])
}

pub fn read_u32(data: &mut &[u8]) -> Result<u32, Error> {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(take(data, 4)?);
    Ok(u32::from_be_bytes(bytes))
}

/// Reads a length written by [`write_len`], refusing lengths larger than the
/// remaining input could possibly hold (each item takes at least `min_item_len` bytes).
pub fn read_len(data: &mut &[u8], min_item_len: usize) -> Result<usize, Error> {
    let len = read_u32(data)? as usize;
    if len.saturating_mul(min_item_len.max(1)) > data.len() {
        return Err(Error::Deserialization(format!(
            "length {len} exceeds the remaining input"
        )));
    }
    Ok(len)
}

/// Reads one group element.
///
/// # Errors
/// [`Error::Deserialization`] on short input, [`Error::GroupMismatch`] if the
/// bytes are not the encoding of an element of `G`.
pub fn read_element<G: GroupEncoding>(data: &mut &[u8]) -> Result<G, Error> {
    let mut repr = G::Repr::default();
    let len = repr.as_ref().len();
    repr.as_mut().copy_from_slice(take(data, len)?);
    Option::from(G::from_bytes(&repr)).ok_or(Error::GroupMismatch)
}

/// Reads `count` group elements.
pub fn read_elements<G: GroupEncoding>(data: &mut &[u8], count: usize) -> Result<Vec<G>, Error> {
    (0..count).map(|_| read_element(data)).collect()
}

/// Reads one big-endian scalar, refusing non-canonical encodings.
pub fn read_scalar<F: PrimeField>(data: &mut &[u8]) -> Result<F, Error> {
    let mut repr = F::Repr::default();
    let len = repr.as_ref().len();
    let bytes = take(data, len)?;
    for (dst, src) in repr.as_mut().iter_mut().zip(bytes.iter().rev()) {
        *dst = *src;
    }
    Option::from(F::from_repr(repr))
        .ok_or_else(|| Error::Deserialization("non-canonical scalar".into()))
}
