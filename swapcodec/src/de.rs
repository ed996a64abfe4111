//! Stream decoder: a self-describing [`serde::Deserializer`].
//!
//! Every hint is forwarded to [`deserialize_any`](de::Deserializer::deserialize_any)
//! because the kind byte already says what follows. Structs are handed to visitors as
//! maps keyed by member name, and enum variants are matched by name, so neither field
//! order nor variant order has to agree between the two ends.
use {
    crate::{
        config::Config,
        error::{
            decode_depth_limit, invalid_char, pointer_sized_decode_error, DecodeError,
            DecodeResult,
        },
        int_encoding::{decode_i64, decode_u64},
        io::Reader,
        kind::Kind,
        len::{read_len, BYTE, MAP_ENTRY, SEQ_ELEMENT},
        registry::{
            DecoderTable, MEMBER_BASE, MEMBER_DEFINITION, MEMBER_END, TYPE_BASE,
            TYPE_DEFINITION,
        },
    },
    core::{fmt, marker::PhantomData, str},
    serde::de::{
        self, value::StrDeserializer, DeserializeOwned, DeserializeSeed, EnumAccess,
        IntoDeserializer, MapAccess, SeqAccess, Unexpected, VariantAccess, Visitor,
    },
};

/// Long-lived decoder state: the descriptors learned from the stream and a scratch
/// buffer strings and byte sequences are staged in before being handed to visitors.
#[derive(Debug, Default)]
pub struct Decoder {
    table: DecoderTable,
    scratch: Vec<u8>,
}

impl Decoder {
    /// Read exactly one value from `reader`.
    ///
    /// Descriptors learned along the way stay pending until [`commit`](Self::commit)
    /// or [`rollback`](Self::rollback).
    pub fn decode<C: Config, T: DeserializeOwned, R: Reader>(
        &mut self,
        reader: &mut R,
    ) -> DecodeResult<T> {
        T::deserialize(&mut self.deserializer::<C, R>(reader))
    }

    /// Read exactly one value from `reader` into `place`.
    pub fn decode_in_place<C: Config, T: DeserializeOwned, R: Reader>(
        &mut self,
        place: &mut T,
        reader: &mut R,
    ) -> DecodeResult<()> {
        T::deserialize_in_place(&mut self.deserializer::<C, R>(reader), place)
    }

    pub fn commit(&mut self) {
        self.table.commit();
    }

    pub fn rollback(&mut self) -> usize {
        self.table.rollback()
    }

    fn deserializer<'a, C, R>(&'a mut self, reader: &'a mut R) -> Deserializer<'a, C, R> {
        Deserializer {
            reader,
            table: &mut self.table,
            scratch: &mut self.scratch,
            depth: 0,
            _config: PhantomData,
        }
    }
}

#[inline]
fn read_raw<'s, C: Config>(
    reader: &mut impl Reader,
    scratch: &'s mut Vec<u8>,
) -> DecodeResult<&'s [u8]> {
    let len = read_len::<C>(reader, BYTE)?;
    scratch.clear();
    scratch.resize(len, 0);
    reader.read_exact(scratch)?;
    Ok(scratch.as_slice())
}

#[inline]
fn read_str<'s, C: Config>(
    reader: &mut impl Reader,
    scratch: &'s mut Vec<u8>,
) -> DecodeResult<&'s str> {
    Ok(str::from_utf8(read_raw::<C>(reader, scratch)?)?)
}

#[inline]
fn read_index(reader: &mut impl Reader) -> DecodeResult<usize> {
    decode_u64(reader).and_then(|v| usize::try_from(v).map_err(|_| pointer_sized_decode_error()))
}

/// Per-call deserializer borrowing the reader and the decoder's state.
pub struct Deserializer<'a, C, R> {
    reader: &'a mut R,
    table: &'a mut DecoderTable,
    scratch: &'a mut Vec<u8>,
    depth: usize,
    _config: PhantomData<C>,
}

impl<C: Config, R: Reader> Deserializer<'_, C, R> {
    #[inline]
    fn kind(&mut self) -> DecodeResult<Kind> {
        Kind::try_from(self.reader.read_byte()?)
    }

    #[inline]
    fn enter(&mut self) -> DecodeResult<()> {
        if self.depth >= C::MAX_DEPTH {
            return Err(decode_depth_limit(C::MAX_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Read a type ref, learning the type if it is defined inline.
    fn type_ref(&mut self) -> DecodeResult<usize> {
        match decode_u64(self.reader)? {
            TYPE_DEFINITION => {
                let id = read_index(self.reader)?;
                let name = read_str::<C>(self.reader, self.scratch)?;
                self.table.define_type(id, name)?;
                Ok(id)
            }
            r => {
                let id = usize::try_from(r - TYPE_BASE).map_err(|_| pointer_sized_decode_error())?;
                self.table.type_name(id)?;
                Ok(id)
            }
        }
    }

    /// Read a member ref of `type_id`. `None` is the end of a struct.
    fn member_ref(&mut self, type_id: usize) -> DecodeResult<Option<usize>> {
        match decode_u64(self.reader)? {
            MEMBER_END => Ok(None),
            MEMBER_DEFINITION => {
                let index = read_index(self.reader)?;
                let name = read_str::<C>(self.reader, self.scratch)?;
                self.table.define_member(type_id, index, name)?;
                Ok(Some(index))
            }
            r => {
                let index =
                    usize::try_from(r - MEMBER_BASE).map_err(|_| pointer_sized_decode_error())?;
                self.table.member(type_id, index)?;
                Ok(Some(index))
            }
        }
    }
}

struct ExpectedLen {
    consumed: usize,
    what: &'static str,
}

impl de::Expected for ExpectedLen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.consumed, self.what)
    }
}

impl<'de, C: Config, R: Reader> de::Deserializer<'de> for &mut Deserializer<'_, C, R> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> DecodeResult<V::Value> {
        match self.kind()? {
            Kind::Unit => visitor.visit_unit(),
            Kind::None => visitor.visit_none(),
            Kind::Some => {
                self.enter()?;
                let value = visitor.visit_some(&mut *self)?;
                self.leave();
                Ok(value)
            }
            Kind::False => visitor.visit_bool(false),
            Kind::True => visitor.visit_bool(true),
            Kind::Int => visitor.visit_i64(decode_i64(self.reader)?),
            Kind::Uint => visitor.visit_u64(decode_u64(self.reader)?),
            Kind::F32 => visitor.visit_f32(f32::from_le_bytes(self.reader.read_array()?)),
            Kind::F64 => visitor.visit_f64(f64::from_le_bytes(self.reader.read_array()?)),
            Kind::Char => {
                let scalar = u32::try_from(decode_u64(self.reader)?).unwrap_or(u32::MAX);
                visitor.visit_char(char::from_u32(scalar).ok_or_else(|| invalid_char(scalar))?)
            }
            Kind::Str => visitor.visit_str(read_str::<C>(self.reader, self.scratch)?),
            Kind::Bytes => visitor.visit_bytes(read_raw::<C>(self.reader, self.scratch)?),
            Kind::Seq => {
                let len = read_len::<C>(self.reader, SEQ_ELEMENT)?;
                self.enter()?;
                let mut access = Elements {
                    de: &mut *self,
                    remaining: len,
                };
                let value = visitor.visit_seq(&mut access)?;
                if access.remaining != 0 {
                    return Err(de::Error::invalid_length(
                        len,
                        &ExpectedLen {
                            consumed: len - access.remaining,
                            what: "elements in sequence",
                        },
                    ));
                }
                self.leave();
                Ok(value)
            }
            Kind::Map => {
                let len = read_len::<C>(self.reader, MAP_ENTRY)?;
                self.enter()?;
                let mut access = Entries {
                    de: &mut *self,
                    remaining: len,
                };
                let value = visitor.visit_map(&mut access)?;
                if access.remaining != 0 {
                    return Err(de::Error::invalid_length(
                        len,
                        &ExpectedLen {
                            consumed: len - access.remaining,
                            what: "entries in map",
                        },
                    ));
                }
                self.leave();
                Ok(value)
            }
            Kind::Struct => {
                self.enter()?;
                let type_id = self.type_ref()?;
                let mut access = Members {
                    de: &mut *self,
                    type_id,
                    done: false,
                };
                let value = visitor.visit_map(&mut access)?;
                if !access.done {
                    return Err(de::Error::custom("struct members left unread"));
                }
                self.leave();
                Ok(value)
            }
            Kind::Variant => {
                self.enter()?;
                let type_id = self.type_ref()?;
                let index = self
                    .member_ref(type_id)?
                    .ok_or(DecodeError::UnexpectedEndMarker)?;
                let value = visitor.visit_enum(Variant {
                    de: &mut *self,
                    type_id,
                    index,
                })?;
                self.leave();
                Ok(value)
            }
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> DecodeResult<V::Value> {
        self.enter()?;
        let value = visitor.visit_newtype_struct(&mut *self)?;
        self.leave();
        Ok(value)
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes
        byte_buf option unit unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

struct Elements<'b, 'a, C, R> {
    de: &'b mut Deserializer<'a, C, R>,
    remaining: usize,
}

impl<'de, C: Config, R: Reader> SeqAccess<'de> for Elements<'_, '_, C, R> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> DecodeResult<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct Entries<'b, 'a, C, R> {
    de: &'b mut Deserializer<'a, C, R>,
    remaining: usize,
}

impl<'de, C: Config, R: Reader> MapAccess<'de> for Entries<'_, '_, C, R> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> DecodeResult<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> DecodeResult<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Struct members, presented as a map keyed by member name.
struct Members<'b, 'a, C, R> {
    de: &'b mut Deserializer<'a, C, R>,
    type_id: usize,
    done: bool,
}

impl<'de, C: Config, R: Reader> MapAccess<'de> for Members<'_, '_, C, R> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> DecodeResult<Option<K::Value>> {
        if self.done {
            return Ok(None);
        }
        let Some(index) = self.de.member_ref(self.type_id)? else {
            self.done = true;
            return Ok(None);
        };
        let name = self.de.table.member(self.type_id, index)?;
        let key: StrDeserializer<'_, DecodeError> = name.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> DecodeResult<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

struct Variant<'b, 'a, C, R> {
    de: &'b mut Deserializer<'a, C, R>,
    type_id: usize,
    index: usize,
}

impl<'de, C: Config, R: Reader> EnumAccess<'de> for Variant<'_, '_, C, R> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> DecodeResult<(V::Value, Self)> {
        let name = self.de.table.member(self.type_id, self.index)?;
        let key: StrDeserializer<'_, DecodeError> = name.into_deserializer();
        let value = seed.deserialize(key)?;
        Ok((value, self))
    }
}

impl<'de, C: Config, R: Reader> VariantAccess<'de> for Variant<'_, '_, C, R> {
    type Error = DecodeError;

    fn unit_variant(self) -> DecodeResult<()> {
        match self.de.kind()? {
            Kind::Unit => Ok(()),
            _ => Err(de::Error::invalid_type(
                Unexpected::Other("variant with payload"),
                &"unit variant",
            )),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> DecodeResult<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> DecodeResult<V::Value> {
        de::Deserializer::deserialize_any(self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> DecodeResult<V::Value> {
        de::Deserializer::deserialize_any(self.de, visitor)
    }
}
