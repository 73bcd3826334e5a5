//! The dictionary: name → [`Name`] record, either a built-in function
//! pointer or a user-defined body (`spec.md` §3, §4.2).

use crate::error::Result;
use crate::frame::Frame;
use crate::interp::Interpreter;
use crate::text::{CodePoint, TtmString};
use std::collections::HashMap;

/// Signature shared by every built-in. Implementations read `frame`'s
/// arguments and write their return text into `interp.result`
/// (`spec.md` §4.4 step 6).
pub type BuiltinFn = fn(&mut Interpreter, &Frame) -> Result<()>;

#[derive(Clone)]
pub enum NameBody {
    Builtin {
        func: BuiltinFn,
        minargs: usize,
        maxargs: usize,
        novalue: bool,
    },
    UserDefined {
        body: Vec<CodePoint>,
        residual: usize,
        maxsegmark: u32,
    },
}

pub struct Name {
    pub name: TtmString,
    pub body: NameBody,
    pub locked: bool,
    pub trace: bool,
}

impl Name {
    pub fn new_builtin(
        name: TtmString,
        func: BuiltinFn,
        minargs: usize,
        maxargs: usize,
        novalue: bool,
        locked: bool,
    ) -> Self {
        Name {
            name,
            body: NameBody::Builtin {
                func,
                minargs,
                maxargs,
                novalue,
            },
            locked,
            trace: false,
        }
    }

    pub fn new_user_defined(name: TtmString, body: Vec<CodePoint>) -> Self {
        Name {
            name,
            body: NameBody::UserDefined {
                body,
                residual: 0,
                maxsegmark: 0,
            },
            locked: false,
            trace: false,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.body, NameBody::Builtin { .. })
    }

    pub fn minargs(&self) -> usize {
        match &self.body {
            NameBody::Builtin { minargs, .. } => *minargs,
            NameBody::UserDefined { .. } => 0,
        }
    }

    pub fn novalue(&self) -> bool {
        match &self.body {
            NameBody::Builtin { novalue, .. } => *novalue,
            NameBody::UserDefined { .. } => false,
        }
    }

    /// Body text, for user-defined names. Builtins have no body.
    pub fn body_text(&self) -> Option<&[CodePoint]> {
        match &self.body {
            NameBody::UserDefined { body, .. } => Some(body),
            NameBody::Builtin { .. } => None,
        }
    }

    /// Mutable body text, for user-defined names. Used by `ap`/`cr`/`sc`/`ss`
    /// to append to or rewrite a body in place.
    pub fn body_mut(&mut self) -> Option<&mut Vec<CodePoint>> {
        match &mut self.body {
            NameBody::UserDefined { body, .. } => Some(body),
            NameBody::Builtin { .. } => None,
        }
    }

    pub fn residual(&self) -> usize {
        match &self.body {
            NameBody::UserDefined { residual, .. } => *residual,
            NameBody::Builtin { .. } => 0,
        }
    }

    pub fn set_residual(&mut self, r: usize) {
        if let NameBody::UserDefined { residual, .. } = &mut self.body {
            *residual = r;
        }
    }

    pub fn maxsegmark(&self) -> u32 {
        match &self.body {
            NameBody::UserDefined { maxsegmark, .. } => *maxsegmark,
            NameBody::Builtin { .. } => 0,
        }
    }

    pub fn set_maxsegmark(&mut self, m: u32) {
        if let NameBody::UserDefined { maxsegmark, .. } = &mut self.body {
            *maxsegmark = m;
        }
    }
}

#[derive(Default)]
pub struct Dictionary {
    names: HashMap<Vec<CodePoint>, Name>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a name with the same key already exists.
    pub fn insert(&mut self, name: Name) -> bool {
        let key = name.name.as_slice().to_vec();
        if self.names.contains_key(&key) {
            return false;
        }
        self.names.insert(key, name);
        true
    }

    /// Inserts unconditionally, replacing any existing entry. Used by
    /// `ds`, which redefines in place rather than failing on collision.
    pub fn insert_or_replace(&mut self, name: Name) {
        let key = name.name.as_slice().to_vec();
        self.names.insert(key, name);
    }

    pub fn lookup(&self, name: &[CodePoint]) -> Option<&Name> {
        self.names.get(name)
    }

    pub fn lookup_mut(&mut self, name: &[CodePoint]) -> Option<&mut Name> {
        self.names.get_mut(name)
    }

    pub fn remove(&mut self, name: &[CodePoint]) -> Option<Name> {
        self.names.remove(name)
    }

    /// Sorted (ordinal) list of names, for the `names()` builtin.
    pub fn sorted_names(&self) -> Vec<TtmString> {
        let mut keys: Vec<&Vec<CodePoint>> = self.names.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|v| TtmString::from_codepoints(v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TtmError;

    fn noop(_: &mut Interpreter, _: &Frame) -> Result<()> {
        Ok(())
    }

    #[test]
    fn insert_rejects_duplicate_key() {
        let mut dict = Dictionary::new();
        assert!(dict.insert(Name::new_user_defined(TtmString::from("a"), vec![])));
        assert!(!dict.insert(Name::new_user_defined(TtmString::from("a"), vec![])));
    }

    #[test]
    fn builtin_metadata_roundtrips() {
        let name = Name::new_builtin(TtmString::from("ad"), noop, 2, 63, false, true);
        assert!(name.is_builtin());
        assert_eq!(name.minargs(), 2);
        assert!(name.locked);
    }

    #[test]
    fn residual_tracks_on_user_defined_only() {
        let mut n = Name::new_user_defined(TtmString::from("x"), vec![1, 2, 3]);
        assert_eq!(n.residual(), 0);
        n.set_residual(2);
        assert_eq!(n.residual(), 2);

        let b = Name::new_builtin(TtmString::from("ad"), noop, 2, 63, false, true);
        assert_eq!(b.residual(), 0);
    }

    #[test]
    fn lookup_missing_yields_noname_in_callers() {
        let dict = Dictionary::new();
        assert!(dict.lookup(&[b'x' as u32]).is_none());
        let _ = TtmError::NoName;
    }
}
