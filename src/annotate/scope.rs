use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;

/// Handle into the annotation's variable arena. Scopes and references hold
/// these instead of the variables themselves so assignments observed later
/// in the analysis stay visible everywhere the variable is shared.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VarId(pub(super) usize);

/// A lexical scope: a name table chained to its parent. Cloning a `Scope`
/// is cheap and aliases the same table, which is what closure environments
/// want.
#[derive(Clone, Debug)]
pub struct Scope {
    data: Rc<RefCell<ScopeData>>,
}

#[derive(Debug)]
struct ScopeData {
    vars: FnvHashMap<String, VarId>,
    parent: Option<Scope>,
}

impl Scope {
    pub fn root() -> Scope {
        Scope {
            data: Rc::new(RefCell::new(ScopeData {
                vars: FnvHashMap::default(),
                parent: None,
            })),
        }
    }

    pub fn child(&self) -> Scope {
        Scope {
            data: Rc::new(RefCell::new(ScopeData {
                vars: FnvHashMap::default(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Bind a name in this scope, shadowing any binding in a parent.
    pub fn define(&self, name: String, id: VarId) {
        self.data.borrow_mut().vars.insert(name, id);
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        let data = self.data.borrow();
        if let Some(&id) = data.vars.get(name) {
            return Some(id);
        }
        data.parent.as_ref().and_then(|p| p.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let root = Scope::root();
        root.define(str!("a"), VarId(0));
        let inner = root.child();
        inner.define(str!("b"), VarId(1));

        assert_eq!(inner.lookup("a"), Some(VarId(0)));
        assert_eq!(inner.lookup("b"), Some(VarId(1)));
        assert_eq!(root.lookup("b"), None);
        assert_eq!(inner.lookup("c"), None);
    }

    #[test]
    fn child_bindings_shadow_the_parent() {
        let root = Scope::root();
        root.define(str!("x"), VarId(0));
        let inner = root.child();
        inner.define(str!("x"), VarId(1));

        assert_eq!(inner.lookup("x"), Some(VarId(1)));
        assert_eq!(root.lookup("x"), Some(VarId(0)));
    }
}
