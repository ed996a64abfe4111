//! Stream encoder: a [`serde::Serializer`] writing the self-describing format.
use {
    crate::{
        config::Config,
        error::{encode_depth_limit, unsupported_type, EncodeError, EncodeResult},
        int_encoding::{encode_i64, encode_u64},
        io::Writer,
        kind::Kind,
        len::{check_len, write_len, BYTE, MAP_ENTRY, SEQ_ELEMENT},
        registry::{
            EncoderTable, Slot, MEMBER_BASE, MEMBER_DEFINITION, MEMBER_END, TYPE_BASE,
            TYPE_DEFINITION,
        },
    },
    core::marker::PhantomData,
    serde::ser::{
        self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
        SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    },
};

/// Long-lived encoder state: the descriptors already sent on the stream.
#[derive(Debug, Default)]
pub struct Encoder {
    table: EncoderTable,
}

impl Encoder {
    /// Write exactly one value to `writer`.
    ///
    /// Descriptors first used by `value` stay pending until [`commit`](Self::commit)
    /// or [`rollback`](Self::rollback).
    pub fn encode<C: Config, T: Serialize + ?Sized, W: Writer>(
        &mut self,
        value: &T,
        writer: &mut W,
    ) -> EncodeResult<()> {
        let mut serializer = Serializer::<C, W> {
            writer,
            table: &mut self.table,
            depth: 0,
            _config: PhantomData,
        };
        value.serialize(&mut serializer)
    }

    pub fn commit(&mut self) {
        self.table.commit();
    }

    pub fn rollback(&mut self) -> usize {
        self.table.rollback()
    }
}

/// Per-call serializer borrowing the writer and the encoder's table.
pub struct Serializer<'a, C, W> {
    writer: &'a mut W,
    table: &'a mut EncoderTable,
    depth: usize,
    _config: PhantomData<C>,
}

impl<C: Config, W: Writer> Serializer<'_, C, W> {
    #[inline]
    fn kind(&mut self, kind: Kind) {
        self.writer.write(&[kind.as_byte()]);
    }

    #[inline]
    fn raw(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        check_len::<C>(bytes.len(), BYTE)?;
        write_len(self.writer, bytes.len());
        self.writer.write(bytes);
        Ok(())
    }

    #[inline]
    fn enter(&mut self) -> EncodeResult<()> {
        if self.depth >= C::MAX_DEPTH {
            return Err(encode_depth_limit(C::MAX_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn type_ref(&mut self, name: &'static str) -> EncodeResult<usize> {
        match self.table.type_slot(name) {
            Slot::Known(id) => {
                encode_u64(id as u64 + TYPE_BASE, self.writer);
                Ok(id)
            }
            Slot::Defined(id) => {
                encode_u64(TYPE_DEFINITION, self.writer);
                encode_u64(id as u64, self.writer);
                self.raw(name.as_bytes())?;
                Ok(id)
            }
        }
    }

    fn member_ref(&mut self, type_id: usize, name: &'static str) -> EncodeResult<()> {
        match self.table.member_slot(type_id, name) {
            Slot::Known(index) => {
                encode_u64(index as u64 + MEMBER_BASE, self.writer);
                Ok(())
            }
            Slot::Defined(index) => {
                encode_u64(MEMBER_DEFINITION, self.writer);
                encode_u64(index as u64, self.writer);
                self.raw(name.as_bytes())
            }
        }
    }

    /// Open a variant: kind, enum type and variant name. The payload follows.
    fn variant(&mut self, name: &'static str, variant: &'static str) -> EncodeResult<()> {
        self.enter()?;
        self.kind(Kind::Variant);
        let type_id = self.type_ref(name)?;
        self.member_ref(type_id, variant)
    }

    fn seq_header(&mut self, kind: Kind, len: Option<usize>) -> EncodeResult<()> {
        let len = len.ok_or(EncodeError::SequenceMustHaveLength)?;
        let min_element_size = match kind {
            Kind::Map => MAP_ENTRY,
            _ => SEQ_ELEMENT,
        };
        check_len::<C>(len, min_element_size)?;
        self.enter()?;
        self.kind(kind);
        write_len(self.writer, len);
        Ok(())
    }

    fn struct_header(&mut self, name: &'static str) -> EncodeResult<usize> {
        self.enter()?;
        self.kind(Kind::Struct);
        self.type_ref(name)
    }
}

impl<'s, 'a, C: Config, W: Writer> ser::Serializer for &'s mut Serializer<'a, C, W> {
    type Ok = ();
    type Error = EncodeError;

    type SerializeSeq = Compound<'s, 'a, C, W>;
    type SerializeTuple = Compound<'s, 'a, C, W>;
    type SerializeTupleStruct = Compound<'s, 'a, C, W>;
    type SerializeTupleVariant = Compound<'s, 'a, C, W>;
    type SerializeMap = Compound<'s, 'a, C, W>;
    type SerializeStruct = StructCompound<'s, 'a, C, W>;
    type SerializeStructVariant = StructCompound<'s, 'a, C, W>;

    fn is_human_readable(&self) -> bool {
        false
    }

    #[inline]
    fn serialize_bool(self, v: bool) -> EncodeResult<()> {
        self.kind(Kind::from_bool(v));
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> EncodeResult<()> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> EncodeResult<()> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> EncodeResult<()> {
        self.serialize_i64(v.into())
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> EncodeResult<()> {
        self.kind(Kind::Int);
        encode_i64(v, self.writer);
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> EncodeResult<()> {
        Err(unsupported_type("i128"))
    }

    fn serialize_u8(self, v: u8) -> EncodeResult<()> {
        self.serialize_u64(v.into())
    }

    fn serialize_u16(self, v: u16) -> EncodeResult<()> {
        self.serialize_u64(v.into())
    }

    fn serialize_u32(self, v: u32) -> EncodeResult<()> {
        self.serialize_u64(v.into())
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> EncodeResult<()> {
        self.kind(Kind::Uint);
        encode_u64(v, self.writer);
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> EncodeResult<()> {
        Err(unsupported_type("u128"))
    }

    fn serialize_f32(self, v: f32) -> EncodeResult<()> {
        self.kind(Kind::F32);
        self.writer.write(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> EncodeResult<()> {
        self.kind(Kind::F64);
        self.writer.write(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_char(self, v: char) -> EncodeResult<()> {
        self.kind(Kind::Char);
        encode_u64(u64::from(v), self.writer);
        Ok(())
    }

    #[inline]
    fn serialize_str(self, v: &str) -> EncodeResult<()> {
        self.kind(Kind::Str);
        self.raw(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> EncodeResult<()> {
        self.kind(Kind::Bytes);
        self.raw(v)
    }

    fn serialize_none(self) -> EncodeResult<()> {
        self.kind(Kind::None);
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> EncodeResult<()> {
        self.enter()?;
        self.kind(Kind::Some);
        value.serialize(&mut *self)?;
        self.leave();
        Ok(())
    }

    fn serialize_unit(self) -> EncodeResult<()> {
        self.kind(Kind::Unit);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> EncodeResult<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> EncodeResult<()> {
        self.variant(name, variant)?;
        self.kind(Kind::Unit);
        self.leave();
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.enter()?;
        value.serialize(&mut *self)?;
        self.leave();
        Ok(())
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.variant(name, variant)?;
        value.serialize(&mut *self)?;
        self.leave();
        Ok(())
    }

    fn serialize_seq(self, len: Option<usize>) -> EncodeResult<Self::SerializeSeq> {
        self.seq_header(Kind::Seq, len)?;
        Ok(Compound { ser: self, nested: 1 })
    }

    fn serialize_tuple(self, len: usize) -> EncodeResult<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> EncodeResult<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> EncodeResult<Self::SerializeTupleVariant> {
        self.variant(name, variant)?;
        self.seq_header(Kind::Seq, Some(len))?;
        Ok(Compound { ser: self, nested: 2 })
    }

    fn serialize_map(self, len: Option<usize>) -> EncodeResult<Self::SerializeMap> {
        self.seq_header(Kind::Map, len)?;
        Ok(Compound { ser: self, nested: 1 })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> EncodeResult<Self::SerializeStruct> {
        let type_id = self.struct_header(name)?;
        Ok(StructCompound {
            ser: self,
            type_id,
            nested: 1,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> EncodeResult<Self::SerializeStructVariant> {
        self.variant(name, variant)?;
        // The payload is a struct typed by the variant's own name.
        let type_id = self.struct_header(variant)?;
        Ok(StructCompound {
            ser: self,
            type_id,
            nested: 2,
        })
    }
}

/// Sequences, tuples and maps. `nested` counts the depth levels opened for it.
pub struct Compound<'s, 'a, C, W> {
    ser: &'s mut Serializer<'a, C, W>,
    nested: usize,
}

impl<C: Config, W: Writer> Compound<'_, '_, C, W> {
    #[inline]
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        value.serialize(&mut *self.ser)
    }

    #[inline]
    fn finish(self) -> EncodeResult<()> {
        for _ in 0..self.nested {
            self.ser.leave();
        }
        Ok(())
    }
}

impl<C: Config, W: Writer> SerializeSeq for Compound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        self.element(value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

impl<C: Config, W: Writer> SerializeTuple for Compound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        self.element(value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

impl<C: Config, W: Writer> SerializeTupleStruct for Compound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        self.element(value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

impl<C: Config, W: Writer> SerializeTupleVariant for Compound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        self.element(value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

impl<C: Config, W: Writer> SerializeMap for Compound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> EncodeResult<()> {
        self.element(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        self.element(value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

/// Structs and struct variants: members are written as `(member ref, value)` pairs
/// closed by an end marker.
pub struct StructCompound<'s, 'a, C, W> {
    ser: &'s mut Serializer<'a, C, W>,
    type_id: usize,
    nested: usize,
}

impl<C: Config, W: Writer> StructCompound<'_, '_, C, W> {
    #[inline]
    fn member<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> EncodeResult<()> {
        self.ser.member_ref(self.type_id, key)?;
        value.serialize(&mut *self.ser)
    }

    #[inline]
    fn finish(self) -> EncodeResult<()> {
        encode_u64(MEMBER_END, self.ser.writer);
        for _ in 0..self.nested {
            self.ser.leave();
        }
        Ok(())
    }
}

impl<C: Config, W: Writer> SerializeStruct for StructCompound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.member(key, value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}

impl<C: Config, W: Writer> SerializeStructVariant for StructCompound<'_, '_, C, W> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.member(key, value)
    }

    fn end(self) -> EncodeResult<()> {
        self.finish()
    }
}
