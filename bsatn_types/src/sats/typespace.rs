use super::AlgebraicType;
use crate::error::SchemaError;
use derive_more::{Display, From, Into};

/// An index into a [`Typespace`].
#[derive(Debug, Display, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[display(fmt = "&{}", _0)]
pub struct AlgebraicTypeRef(pub u32);

impl AlgebraicTypeRef {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// An arena of named-by-index types, so that a type may refer to itself
/// (directly or through other types) without owning itself.
///
/// A slot may be reserved first and defined later, which is how a recursive
/// type gets hold of its own reference.
#[derive(Debug, Clone, Default)]
pub struct Typespace {
    types: Vec<Option<AlgebraicType>>,
}

impl Typespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn add(&mut self, ty: AlgebraicType) -> AlgebraicTypeRef {
        let r = self.next_ref();
        self.types.push(Some(ty));
        r
    }

    pub fn reserve(&mut self) -> AlgebraicTypeRef {
        let r = self.next_ref();
        self.types.push(None);
        r
    }

    pub fn define(&mut self, r: AlgebraicTypeRef, ty: AlgebraicType) -> Result<(), SchemaError> {
        let len = self.types.len();
        match self.types.get_mut(r.idx()) {
            None => Err(SchemaError::UnknownRef { target: r, len }),
            Some(Some(_)) => Err(SchemaError::AlreadyDefined(r)),
            Some(slot @ None) => {
                *slot = Some(ty);
                Ok(())
            }
        }
    }

    pub fn get(&self, r: AlgebraicTypeRef) -> Option<&AlgebraicType> {
        self.types.get(r.idx()).and_then(Option::as_ref)
    }

    fn next_ref(&self) -> AlgebraicTypeRef {
        AlgebraicTypeRef(self.types.len() as u32)
    }

    /// Follows a chain of bare references until a non-reference type is reached.
    ///
    /// Returns `None` if a reference is dangling or undefined, or the chain loops.
    pub fn resolve<'a>(&'a self, mut ty: &'a AlgebraicType) -> Option<&'a AlgebraicType> {
        for _ in 0..=self.types.len() {
            match ty {
                AlgebraicType::Ref(r) => ty = self.get(*r)?,
                _ => return Some(ty),
            }
        }
        None
    }

    /// Checks that every slot is defined, every reference points at a slot,
    /// and no slot is an endless chain of bare references.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (idx, slot) in self.types.iter().enumerate() {
            let at = AlgebraicTypeRef(idx as u32);
            let ty = slot.as_ref().ok_or(SchemaError::Undefined(at))?;
            self.check_refs(at, ty)?;
        }
        for idx in 0..self.types.len() {
            let at = AlgebraicTypeRef(idx as u32);
            if let Some(ty) = self.get(at) {
                if self.resolve(ty).is_none() {
                    return Err(SchemaError::RefCycle(at));
                }
            }
        }
        Ok(())
    }

    fn check_refs(&self, at: AlgebraicTypeRef, ty: &AlgebraicType) -> Result<(), SchemaError> {
        match ty {
            AlgebraicType::Ref(target) if target.idx() >= self.types.len() => {
                Err(SchemaError::DanglingRef {
                    at,
                    target: *target,
                    len: self.types.len(),
                })
            }
            AlgebraicType::Sum(sum) => sum
                .variants
                .iter()
                .try_for_each(|v| self.check_refs(at, &v.ty)),
            AlgebraicType::Struct(st) => st
                .fields
                .iter()
                .try_for_each(|f| self.check_refs(at, &f.ty)),
            AlgebraicType::Array(elem) => self.check_refs(at, elem),
            AlgebraicType::Map(map) => {
                self.check_refs(at, &map.key)?;
                self.check_refs(at, &map.value)
            }
            AlgebraicType::Tuple(tup) => tup
                .elems
                .iter()
                .try_for_each(|e| self.check_refs(at, e)),
            _ => Ok(()),
        }
    }
}
