//! Bit processing utilities
use crate::*;
use core::fmt;
use core::str::FromStr;

/// Growable sequence of bits, packed MSB-first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    buf: Vec<u8>,
    bit_count: usize,
}

impl BitString {
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            bit_count: 0,
        }
    }

    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bits.div_ceil(8)),
            bit_count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bit_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Packed bytes; trailing bits of the last byte are zero
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn push_bool(&mut self, value: bool) {
        let bit_position = self.bit_count & 7;
        if bit_position == 0 {
            self.buf.push(0);
        }
        if value {
            if let Some(acc) = self.buf.last_mut() {
                *acc |= 0x80 >> bit_position;
            }
        }
        self.bit_count += 1;
    }

    pub fn push_bits(&mut self, other: &BitString) {
        if self.bit_count & 7 == 0 {
            self.buf.extend_from_slice(&other.buf);
            self.bit_count += other.bit_count;
            return;
        }
        for bit in other.iter() {
            self.push_bool(bit);
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.bit_count).then(|| self.buf[index >> 3] & (0x80 >> (index & 7)) != 0)
    }

    pub fn starts_with(&self, prefix: &BitString) -> bool {
        prefix.bit_count <= self.bit_count && prefix.iter().zip(self.iter()).all(|(a, b)| a == b)
    }

    #[inline]
    pub fn iter(&self) -> BitStreamReader<'_> {
        BitStreamReader::new(self)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            if width > self.bit_count {
                for _ in 0..width - self.bit_count {
                    write!(f, " ")?;
                }
            }
        }
        for bit in self.iter() {
            write!(f, "{}", bit as u8)?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::with_capacity(s.len());
        for (position, digit) in s.chars().enumerate() {
            match digit {
                '0' => result.push_bool(false),
                '1' => result.push_bool(true),
                _ => return Err(DecodeError::InvalidDigit { position }),
            }
        }
        Ok(result)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl Extend<bool> for BitString {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        for bit in iter {
            self.push_bool(bit);
        }
    }
}

impl<'a> IntoIterator for &'a BitString {
    type Item = bool;
    type IntoIter = BitStreamReader<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reads a [`BitString`] front to back, tracking how many bits were consumed
#[derive(Debug, Clone)]
pub struct BitStreamReader<'a> {
    bits: &'a BitString,
    position: usize,
}

impl<'a> BitStreamReader<'a> {
    #[inline]
    pub fn new(bits: &'a BitString) -> Self {
        Self { bits, position: 0 }
    }
}

impl BitStreamReader<'_> {
    #[inline]
    pub fn read_bool(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position)?;
        self.position += 1;
        Some(bit)
    }

    /// Number of bits read so far
    #[inline]
    pub fn consumed(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position >= self.bits.len()
    }
}

impl Iterator for BitStreamReader<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.read_bool()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remain = self.bits.len() - self.position;
        (remain, Some(remain))
    }
}

impl ExactSizeIterator for BitStreamReader<'_> {}
