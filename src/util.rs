use std::fmt::{self, Display};

pub(crate) type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, BuildHasher>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, BuildHasher>;
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// Displays the items of an iterator separated by a fixed string.
///
/// `ListDisplay(vars.iter(), ", ")` prints `a, b, c`.
pub(crate) struct ListDisplay<'a, I>(pub I, pub &'a str);

impl<I> Display for ListDisplay<'_, I>
where
    I: IntoIterator + Clone,
    I::Item: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut did_something = false;
        for item in self.0.clone() {
            if did_something {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
            did_something = true;
        }
        Ok(())
    }
}
