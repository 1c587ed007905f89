#![allow(missing_docs)]

//! Parse binary data
//!
//! Reading is done through a `ReadScope`, a window onto a byte slice that remembers its
//! position in the enclosing file, and a `ReadCtxt`, a cursor over a scope. Every read is
//! bounds checked; running off the end of the data is reported as `ParseError::BadEof`.

use crate::binary::{U16Be, U32Be};
use crate::error::ParseError;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Copy, Clone)]
pub struct ReadEof {}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReadScope<'a> {
    data: &'a [u8],
}

#[derive(Clone)]
pub struct ReadCtxt<'a> {
    scope: ReadScope<'a>,
    offset: usize,
}

pub trait ReadBinary {
    type HostType<'a>: Sized; // default = Self

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError>;
}

/// Read will always succeed if sufficient bytes are available.
pub trait ReadUnchecked {
    type HostType: Sized; // default = Self

    /// The number of bytes consumed by `read_unchecked`.
    const SIZE: usize;

    /// Must read exactly `SIZE` bytes.
    /// Unsafe as it avoids per-byte bounds checking.
    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> Self::HostType;
}

/// Build a value from a fixed size tuple of primitive reads.
pub trait ReadFrom {
    type ReadType: ReadUnchecked;
    fn read_from(value: <Self::ReadType as ReadUnchecked>::HostType) -> Self;
}

impl<T> ReadUnchecked for T
where
    T: ReadFrom,
{
    type HostType = T;

    const SIZE: usize = T::ReadType::SIZE;

    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> Self::HostType {
        let t = T::ReadType::read_unchecked(ctxt);
        T::read_from(t)
    }
}

impl<T> ReadBinary for T
where
    T: ReadUnchecked,
{
    type HostType<'a> = T::HostType;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        ctxt.check_avail(T::SIZE)?;
        // Safe because we have `SIZE` bytes available.
        Ok(unsafe { T::read_unchecked(ctxt) })
    }
}

/// A lazily decoded array of fixed size records.
#[derive(Clone)]
pub struct ReadArray<'a, T: ReadUnchecked> {
    scope: ReadScope<'a>,
    length: usize,
    marker: PhantomData<T>,
}

pub struct ReadArrayIter<'a, T: ReadUnchecked> {
    scope: ReadScope<'a>,
    index: usize,
    length: usize,
    marker: PhantomData<T>,
}

impl<'a> ReadScope<'a> {
    pub fn new(data: &'a [u8]) -> ReadScope<'a> {
        ReadScope { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offset(&self, offset: usize) -> ReadScope<'a> {
        let data = self.data.get(offset..).unwrap_or(&[]);
        ReadScope { data }
    }

    pub fn offset_length(&self, offset: usize, length: usize) -> Result<ReadScope<'a>, ParseError> {
        if offset < self.data.len() || length == 0 {
            let data = self.data.get(offset..).unwrap_or(&[]);
            if length <= data.len() {
                let data = &data[0..length];
                Ok(ReadScope { data })
            } else {
                Err(ParseError::BadEof)
            }
        } else {
            Err(ParseError::BadOffset)
        }
    }

    pub fn ctxt(&self) -> ReadCtxt<'a> {
        ReadCtxt::new(*self)
    }

    pub fn read<T: ReadBinary>(&self) -> Result<T::HostType<'a>, ParseError> {
        self.ctxt().read::<T>()
    }
}

impl<'a> ReadCtxt<'a> {
    /// ReadCtxt is constructed by calling `ReadScope::ctxt`.
    fn new(scope: ReadScope<'a>) -> ReadCtxt<'a> {
        ReadCtxt { scope, offset: 0 }
    }

    /// Check a condition, returning `ParseError::BadValue` if `false`.
    pub fn check(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadValue),
        }
    }

    /// Check a condition, returning `ParseError::BadVersion` if `false`.
    ///
    /// Intended for use in checking versions read from data. Example:
    ///
    /// ```
    /// use fontname::binary::read::ReadScope;
    /// use fontname::error::ParseError;
    ///
    /// let scope = ReadScope::new(&[0, 1]);
    /// let mut ctxt = scope.ctxt();
    /// let format = ctxt.read_u16be().expect("unable to read format");
    ///
    /// assert!(ctxt.check_version(format <= 1).is_ok());
    /// assert_eq!(ctxt.check_version(format == 0), Err(ParseError::BadVersion));
    /// ```
    pub fn check_version(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadVersion),
        }
    }

    pub fn scope(&self) -> ReadScope<'a> {
        self.scope.offset(self.offset)
    }

    pub fn read<T: ReadBinary>(&mut self) -> Result<T::HostType<'a>, ParseError> {
        T::read(self)
    }

    fn check_avail(&self, length: usize) -> Result<(), ReadEof> {
        match self.offset.checked_add(length) {
            Some(endpos) if endpos <= self.scope.data.len() => Ok(()),
            _ => Err(ReadEof {}),
        }
    }

    unsafe fn read_unchecked_u16be(&mut self) -> u16 {
        let hi = u16::from(*self.scope.data.get_unchecked(self.offset));
        let lo = u16::from(*self.scope.data.get_unchecked(self.offset + 1));
        self.offset += 2;
        (hi << 8) | lo
    }

    unsafe fn read_unchecked_u32be(&mut self) -> u32 {
        let hi = u32::from(self.read_unchecked_u16be());
        let lo = u32::from(self.read_unchecked_u16be());
        (hi << 16) | lo
    }

    pub fn read_u16be(&mut self) -> Result<u16, ReadEof> {
        self.check_avail(2)?;
        // Safe because we have 2 bytes available.
        Ok(unsafe { self.read_unchecked_u16be() })
    }

    pub fn read_u32be(&mut self) -> Result<u32, ReadEof> {
        self.check_avail(4)?;
        // Safe because we have 4 bytes available.
        Ok(unsafe { self.read_unchecked_u32be() })
    }

    pub fn read_array<T: ReadUnchecked>(
        &mut self,
        length: usize,
    ) -> Result<ReadArray<'a, T>, ParseError> {
        let size = length.checked_mul(T::SIZE).ok_or(ParseError::BadValue)?;
        let scope = self.read_scope(size)?;
        Ok(ReadArray {
            scope,
            length,
            marker: PhantomData,
        })
    }

    pub fn read_scope(&mut self, length: usize) -> Result<ReadScope<'a>, ReadEof> {
        if let Ok(scope) = self.scope.offset_length(self.offset, length) {
            self.offset += length;
            Ok(scope)
        } else {
            Err(ReadEof {})
        }
    }
}

impl<'a, T: ReadUnchecked> ReadArray<'a, T> {
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn get_item(&self, index: usize) -> Option<T::HostType> {
        if index < self.length {
            let mut ctxt = self.scope.offset(index * T::SIZE).ctxt();
            ctxt.check_avail(T::SIZE).ok()?;
            // Safe because we have `SIZE` bytes available.
            Some(unsafe { T::read_unchecked(&mut ctxt) })
        } else {
            None
        }
    }

    pub fn read_item(&self, index: usize) -> Result<T::HostType, ParseError> {
        self.get_item(index).ok_or(ParseError::BadIndex)
    }

    pub fn to_vec(&self) -> Vec<T::HostType> {
        self.iter().collect()
    }

    pub fn iter(&self) -> ReadArrayIter<'a, T> {
        ReadArrayIter {
            scope: self.scope,
            index: 0,
            length: self.length,
            marker: PhantomData,
        }
    }
}

impl<'a, 'b, T: ReadUnchecked> IntoIterator for &'b ReadArray<'a, T> {
    type Item = T::HostType;
    type IntoIter = ReadArrayIter<'a, T>;
    fn into_iter(self) -> ReadArrayIter<'a, T> {
        self.iter()
    }
}

impl<'a, T: ReadUnchecked> Iterator for ReadArrayIter<'a, T> {
    type Item = T::HostType;

    fn next(&mut self) -> Option<T::HostType> {
        if self.index >= self.length {
            return None;
        }
        let mut ctxt = self.scope.offset(self.index * T::SIZE).ctxt();
        ctxt.check_avail(T::SIZE).ok()?;
        self.index += 1;
        // SAFETY: Ok because we have (at least) `SIZE` bytes available.
        Some(unsafe { T::read_unchecked(&mut ctxt) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.length - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, T: ReadUnchecked> ExactSizeIterator for ReadArrayIter<'a, T> {}

impl ReadUnchecked for U16Be {
    type HostType = u16;

    const SIZE: usize = 2;

    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> u16 {
        ctxt.read_unchecked_u16be()
    }
}

impl ReadUnchecked for U32Be {
    type HostType = u32;

    const SIZE: usize = 4;

    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> u32 {
        ctxt.read_unchecked_u32be()
    }
}

impl<T1, T2> ReadUnchecked for (T1, T2)
where
    T1: ReadUnchecked,
    T2: ReadUnchecked,
{
    type HostType = (T1::HostType, T2::HostType);

    const SIZE: usize = T1::SIZE + T2::SIZE;

    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> Self::HostType {
        let t1 = T1::read_unchecked(ctxt);
        let t2 = T2::read_unchecked(ctxt);
        (t1, t2)
    }
}

impl<T1, T2, T3> ReadUnchecked for (T1, T2, T3)
where
    T1: ReadUnchecked,
    T2: ReadUnchecked,
    T3: ReadUnchecked,
{
    type HostType = (T1::HostType, T2::HostType, T3::HostType);

    const SIZE: usize = T1::SIZE + T2::SIZE + T3::SIZE;

    unsafe fn read_unchecked(ctxt: &mut ReadCtxt<'_>) -> Self::HostType {
        let t1 = T1::read_unchecked(ctxt);
        let t2 = T2::read_unchecked(ctxt);
        let t3 = T3::read_unchecked(ctxt);
        (t1, t2, t3)
    }
}

impl<'a, T> fmt::Debug for ReadArray<'a, T>
where
    T: ReadUnchecked,
    T::HostType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}
