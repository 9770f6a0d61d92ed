use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// A fixed set of files shipped with the crate. In release builds their
/// contents are embedded in the binary; in debug builds they are read from
/// the crate directory so edits show up without a rebuild.
pub struct Assets {
    /// The directory path for this set of assets.
    pub dir: &'static str,

    /// Each file's name and, if embedded, its contents.
    files: &'static [(&'static str, Option<&'static str>)],
}

impl Assets {
    pub const fn new(dir: &'static str, files: &'static [(&'static str, Option<&'static str>)]) -> Self {
        Self { dir, files }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.files.iter().map(|(n, _)| *n)
    }

    /// Get an asset's contents, from the binary if embedded or else from
    /// disk. Returns None for names that aren't part of the set.
    pub fn load(&self, name: &str) -> std::io::Result<Option<Cow<'static, str>>> {
        match self.files.iter().find(|(n, _)| *n == name) {
            None => Ok(None),
            Some((_, Some(contents))) => Ok(Some(Cow::Borrowed(*contents))),
            Some((n, None)) => fs::read_to_string(Path::new(self.dir).join(n))
                .map(|s| Some(Cow::Owned(s))),
        }
    }

    /// Load every asset, returning each name with its contents.
    pub fn load_all(&self) -> impl Iterator<Item = (&'static str, std::io::Result<Cow<'static, str>>)> {
        self.names().map(|name| {
            let contents = self.load(name).map(|c| c.expect("registered asset must be loadable"));
            (name, contents)
        })
    }
}

/// Contents of one asset file: embedded in release builds, left for the
/// filesystem in debug builds.
#[cfg(not(debug_assertions))]
macro_rules! embed {
    ($dirname:literal, $filename:literal) => {
        Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/", $dirname, "/", $filename)))
    };
}

#[cfg(debug_assertions)]
macro_rules! embed {
    ($dirname:literal, $filename:literal) => {
        None
    };
}

/// Declare a set of asset files living in a directory of the crate.
macro_rules! assets {
    ($constname:ident, $dirname:literal, [ $($filename:literal),* ]) => {
        pub(crate) const $constname: $crate::assets::Assets = $crate::assets::Assets::new(
            concat!(env!("CARGO_MANIFEST_DIR"), "/", $dirname),
            &[$( ($filename, $crate::assets::embed!($dirname, $filename)), )*],
        );
    };
}

pub(crate) use assets;
pub(crate) use embed;
