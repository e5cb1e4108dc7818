use std::fmt;

/// Accessor pair focusing on one field of a state.
///
/// Built from plain functions so it is `Copy` and can be stored inside
/// reducers without boxing:
///
/// ```
/// use tca_runtime::Lens;
///
/// struct App { count: i32 }
///
/// let count = Lens::new(|app: &App| &app.count, |app: &mut App| &mut app.count);
/// let mut app = App { count: 1 };
/// *count.get_mut(&mut app) += 1;
/// assert_eq!(*count.get(&app), 2);
/// ```
pub struct Lens<Root, Value> {
    get: fn(&Root) -> &Value,
    get_mut: fn(&mut Root) -> &mut Value,
}

impl<Root, Value> Lens<Root, Value> {
    pub fn new(get: fn(&Root) -> &Value, get_mut: fn(&mut Root) -> &mut Value) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, root: &'a Root) -> &'a Value {
        (self.get)(root)
    }

    pub fn get_mut<'a>(&self, root: &'a mut Root) -> &'a mut Value {
        (self.get_mut)(root)
    }
}

impl<Root, Value> Clone for Lens<Root, Value> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root, Value> Copy for Lens<Root, Value> {}

impl<Root, Value> fmt::Debug for Lens<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lens<{}, {}>",
            std::any::type_name::<Root>(),
            std::any::type_name::<Value>()
        )
    }
}

/// Extractor/embedder pair for one case of an action enum.
///
/// `extract` hands the action back unchanged when it belongs to another case,
/// so the parent still gets to see it.
///
/// ```
/// use tca_runtime::CasePath;
///
/// enum AppAction { Counter(i32), Reset }
///
/// let counter = CasePath::new(
///     |action: AppAction| match action {
///         AppAction::Counter(delta) => Ok(delta),
///         other => Err(other),
///     },
///     AppAction::Counter,
/// );
/// assert_eq!(counter.extract(AppAction::Counter(3)).ok(), Some(3));
/// assert!(counter.extract(AppAction::Reset).is_err());
/// ```
pub struct CasePath<Root, Value> {
    extract: fn(Root) -> Result<Value, Root>,
    embed: fn(Value) -> Root,
}

impl<Root, Value> CasePath<Root, Value> {
    pub fn new(extract: fn(Root) -> Result<Value, Root>, embed: fn(Value) -> Root) -> Self {
        Self { extract, embed }
    }

    pub fn extract(&self, root: Root) -> Result<Value, Root> {
        (self.extract)(root)
    }

    pub fn embed(&self, value: Value) -> Root {
        (self.embed)(value)
    }

    pub(crate) fn embedder(&self) -> fn(Value) -> Root {
        self.embed
    }
}

impl<Root, Value> Clone for CasePath<Root, Value> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root, Value> Copy for CasePath<Root, Value> {}

impl<Root, Value> fmt::Debug for CasePath<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CasePath<{}, {}>",
            std::any::type_name::<Root>(),
            std::any::type_name::<Value>()
        )
    }
}
