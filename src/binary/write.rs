#![deny(missing_docs)]

//! Write binary data

use std::marker::PhantomData;

use crate::binary::read::{ReadScope, ReadUnchecked};
use crate::binary::{U16Be, U32Be};
use crate::error::WriteError;

/// An in-memory buffer that implements `WriteContext`.
#[derive(Debug, Default)]
pub struct WriteBuffer {
    data: Vec<u8>,
}

struct WriteSlice<'a> {
    offset: usize,
    data: &'a mut [u8],
}

/// A placeholder for a value that will be filled in later using WriteContext::write_placeholder
pub struct Placeholder<T, HostType>
where
    T: WriteBinary<HostType>,
{
    offset: usize,
    length: usize,
    marker: PhantomData<T>,
    host: PhantomData<HostType>,
}

/// Trait that describes a type that can be written to a `WriteContext` in binary form.
pub trait WriteBinary<HostType = Self> {
    /// The type of the value returned by `write`.
    type Output;

    /// Write the binary representation of Self to `ctxt`.
    fn write<C: WriteContext>(ctxt: &mut C, val: HostType) -> Result<Self::Output, WriteError>;
}

/// Trait for types that can have binary data written to them.
pub trait WriteContext {
    /// Write each value produced by `iter` to the `WriteContext`.
    fn write_iter<T, HostType>(
        &mut self,
        iter: impl Iterator<Item = HostType>,
    ) -> Result<(), WriteError>
    where
        Self: Sized,
        T: WriteBinary<HostType>,
    {
        for val in iter {
            T::write(self, val)?;
        }

        Ok(())
    }

    /// Write a slice of bytes to a `WriteContext`.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WriteError>;

    /// Write the specified number of zero bytes to the `WriteContext`.
    fn write_zeros(&mut self, count: usize) -> Result<(), WriteError>;

    /// The total number of bytes written so far.
    fn bytes_written(&self) -> usize;

    /// Return a placeholder to `T` in the context for filling in later.
    fn placeholder<T, HostType>(&mut self) -> Result<Placeholder<T, HostType>, WriteError>
    where
        T: WriteBinary<HostType> + ReadUnchecked,
    {
        let offset = self.bytes_written();
        self.write_zeros(T::SIZE)?;

        Ok(Placeholder {
            offset,
            length: T::SIZE,
            marker: PhantomData,
            host: PhantomData,
        })
    }

    /// Consumes the placeholder and writes the supplied value into it
    fn write_placeholder<T, HostType>(
        &mut self,
        placeholder: Placeholder<T, HostType>,
        val: HostType,
    ) -> Result<T::Output, WriteError>
    where
        T: WriteBinary<HostType>;
}

impl<T> WriteBinary<T> for U16Be
where
    T: Into<u16>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u16 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl<T> WriteBinary<T> for U32Be
where
    T: Into<u32>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u32 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl<'a> WriteBinary for ReadScope<'a> {
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, scope: Self) -> Result<(), WriteError> {
        ctxt.write_bytes(scope.data())
    }
}

impl WriteContext for WriteBuffer {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WriteError> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn write_zeros(&mut self, count: usize) -> Result<(), WriteError> {
        self.data.resize(self.data.len() + count, 0);
        Ok(())
    }

    fn bytes_written(&self) -> usize {
        self.data.len()
    }

    fn write_placeholder<T, HostType>(
        &mut self,
        placeholder: Placeholder<T, HostType>,
        val: HostType,
    ) -> Result<T::Output, WriteError>
    where
        T: WriteBinary<HostType>,
    {
        let end = placeholder
            .offset
            .checked_add(placeholder.length)
            .ok_or(WriteError::PlaceholderMismatch)?;
        let data = self
            .data
            .get_mut(placeholder.offset..end)
            .ok_or(WriteError::PlaceholderMismatch)?;
        let mut slice = WriteSlice { offset: 0, data };
        let output = T::write(&mut slice, val)?;
        if slice.offset == placeholder.length {
            Ok(output)
        } else {
            Err(WriteError::PlaceholderMismatch)
        }
    }
}

impl<'a> WriteContext for WriteSlice<'a> {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WriteError> {
        let end = self.offset + data.len();
        match self.data.get_mut(self.offset..end) {
            Some(subslice) => {
                subslice.copy_from_slice(data);
                self.offset = end;
                Ok(())
            }
            None => Err(WriteError::PlaceholderMismatch),
        }
    }

    fn write_zeros(&mut self, count: usize) -> Result<(), WriteError> {
        let end = self.offset + count;
        match self.data.get_mut(self.offset..end) {
            Some(subslice) => {
                subslice.fill(0);
                self.offset = end;
                Ok(())
            }
            None => Err(WriteError::PlaceholderMismatch),
        }
    }

    fn bytes_written(&self) -> usize {
        self.offset
    }

    fn write_placeholder<T, HostType>(
        &mut self,
        _placeholder: Placeholder<T, HostType>,
        _val: HostType,
    ) -> Result<T::Output, WriteError>
    where
        T: WriteBinary<HostType>,
    {
        Err(WriteError::NotImplemented)
    }
}

impl WriteBuffer {
    /// Create a new, empty `WriteBuffer`
    pub fn new() -> Self {
        WriteBuffer { data: Vec::new() }
    }

    /// The number of bytes in this buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Retrieve a slice of the data held by this buffer
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume `self` and return the inner buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
