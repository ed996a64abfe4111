//! Type descriptor tables for both ends of a stream.
//!
//! A descriptor is a type name plus the member names (struct fields or enum variants)
//! seen for it so far. The encoder hands out ids the first time it meets a type or
//! member and the decoder learns them from the inline definitions that follow. Each
//! table journals its additions so a failed call can be undone without disturbing
//! what earlier calls established.
use {
    crate::error::{unknown_member, unknown_type, DecodeError, DecodeResult},
    std::collections::HashMap,
};

/// Type ref introducing a new type definition.
pub const TYPE_DEFINITION: u64 = 0;
/// Offset added to a type id when referring to a known type.
pub const TYPE_BASE: u64 = 1;
/// Member ref closing a struct.
pub const MEMBER_END: u64 = 0;
/// Member ref introducing a new member definition.
pub const MEMBER_DEFINITION: u64 = 1;
/// Offset added to a member index when referring to a known member.
pub const MEMBER_BASE: u64 = 2;

/// Where a name ended up in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Already known; refer to it by id.
    Known(usize),
    /// Just added; its definition must go on the stream.
    Defined(usize),
}

#[derive(Debug, Clone, Copy)]
enum Addition {
    Type,
    Member(usize),
}

#[derive(Debug)]
struct EncodedType {
    name: &'static str,
    members: Vec<&'static str>,
}

/// Descriptors the encoder has already put on the stream.
#[derive(Debug, Default)]
pub struct EncoderTable {
    types: Vec<EncodedType>,
    ids: HashMap<&'static str, usize>,
    journal: Vec<Addition>,
}

impl EncoderTable {
    pub fn type_slot(&mut self, name: &'static str) -> Slot {
        if let Some(&id) = self.ids.get(name) {
            return Slot::Known(id);
        }
        let id = self.types.len();
        self.types.push(EncodedType {
            name,
            members: Vec::new(),
        });
        self.ids.insert(name, id);
        self.journal.push(Addition::Type);
        log::trace!("encoder defined type {id} as `{name}`");
        Slot::Defined(id)
    }

    /// `type_id` must come from [`type_slot`](Self::type_slot).
    pub fn member_slot(&mut self, type_id: usize, name: &'static str) -> Slot {
        let ty = &mut self.types[type_id];
        if let Some(index) = ty.members.iter().position(|&member| member == name) {
            return Slot::Known(index);
        }
        let index = ty.members.len();
        ty.members.push(name);
        self.journal.push(Addition::Member(type_id));
        log::trace!("encoder defined member {index} of `{}` as `{name}`", ty.name);
        Slot::Defined(index)
    }

    /// Keep everything added since the last commit or rollback.
    pub fn commit(&mut self) {
        self.journal.clear();
    }

    /// Forget everything added since the last commit or rollback and return how many
    /// additions were undone.
    pub fn rollback(&mut self) -> usize {
        let undone = self.journal.len();
        while let Some(addition) = self.journal.pop() {
            match addition {
                Addition::Type => {
                    if let Some(ty) = self.types.pop() {
                        self.ids.remove(ty.name);
                    }
                }
                Addition::Member(type_id) => {
                    self.types[type_id].members.pop();
                }
            }
        }
        undone
    }

    #[cfg(test)]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[derive(Debug)]
struct DecodedType {
    name: String,
    members: Vec<String>,
}

/// Descriptors the decoder has learned from the stream.
#[derive(Debug, Default)]
pub struct DecoderTable {
    types: Vec<DecodedType>,
    journal: Vec<Addition>,
}

impl DecoderTable {
    /// Record the definition of type `id`.
    ///
    /// Ids must arrive in order. A definition repeating what is already known is
    /// accepted, so the same encoded bytes can be decoded more than once.
    pub fn define_type(&mut self, id: usize, name: &str) -> DecodeResult<()> {
        let next = self.types.len();
        if let Some(known) = self.types.get(id) {
            if known.name != name {
                return Err(DecodeError::ConflictingDefinition {
                    what: "type",
                    id,
                    known: known.name.clone(),
                    found: name.to_owned(),
                });
            }
            return Ok(());
        }
        if id != next {
            return Err(DecodeError::OutOfOrderDefinition {
                what: "type",
                id,
                next,
            });
        }
        self.types.push(DecodedType {
            name: name.to_owned(),
            members: Vec::new(),
        });
        self.journal.push(Addition::Type);
        log::trace!("decoder learned type {id} as `{name}`");
        Ok(())
    }

    /// Record the definition of member `index` of type `type_id`.
    pub fn define_member(&mut self, type_id: usize, index: usize, name: &str) -> DecodeResult<()> {
        let ty = self
            .types
            .get_mut(type_id)
            .ok_or_else(|| unknown_type(type_id))?;
        let next = ty.members.len();
        if let Some(known) = ty.members.get(index) {
            if known != name {
                return Err(DecodeError::ConflictingDefinition {
                    what: "member",
                    id: index,
                    known: known.clone(),
                    found: name.to_owned(),
                });
            }
            return Ok(());
        }
        if index != next {
            return Err(DecodeError::OutOfOrderDefinition {
                what: "member",
                id: index,
                next,
            });
        }
        ty.members.push(name.to_owned());
        self.journal.push(Addition::Member(type_id));
        log::trace!("decoder learned member {index} of `{}` as `{name}`", ty.name);
        Ok(())
    }

    pub fn type_name(&self, id: usize) -> DecodeResult<&str> {
        self.types
            .get(id)
            .map(|ty| ty.name.as_str())
            .ok_or_else(|| unknown_type(id))
    }

    pub fn member(&self, type_id: usize, index: usize) -> DecodeResult<&str> {
        self.types
            .get(type_id)
            .ok_or_else(|| unknown_type(type_id))?
            .members
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| unknown_member(type_id, index))
    }

    /// Keep everything learned since the last commit or rollback.
    pub fn commit(&mut self) {
        self.journal.clear();
    }

    /// Forget everything learned since the last commit or rollback and return how many
    /// additions were undone.
    pub fn rollback(&mut self) -> usize {
        let undone = self.journal.len();
        while let Some(addition) = self.journal.pop() {
            match addition {
                Addition::Type => {
                    self.types.pop();
                }
                Addition::Member(type_id) => {
                    if let Some(ty) = self.types.get_mut(type_id) {
                        ty.members.pop();
                    }
                }
            }
        }
        undone
    }

    #[cfg(test)]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
