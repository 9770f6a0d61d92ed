use crate::assets::assets;
use crate::config::Config;
use crate::markdown;
use anyhow::{Context as _, Result, bail};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const HEADER: &str = "header.html";
const SIDEBAR: &str = "sidebar.html";
const FOOTER: &str = "footer.html";

// Default fragments written by `--init`.
assets!(FRAGMENTS, "templates", ["header.html", "sidebar.html", "footer.html"]);

pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    tmpls: minijinja::Environment<'static>,
}

impl Context {
    pub fn new(root: &Path, config: Config) -> Self {
        let mut tmpls = minijinja::Environment::new();
        tmpls.set_loader(minijinja::path_loader(root.join(&config.includes)));
        Self {
            root: root.into(),
            config,
            tmpls,
        }
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.config.source)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.root.join(&self.config.includes)
    }

    /// Read the Markdown source, failing with a clear message if it's absent.
    fn read_source(&self) -> Result<String> {
        let path = self.source_path();
        match fs::read_to_string(&path) {
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                bail!("source not found: {}", path.display())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
            Ok(source) => {
                log::info!("read {} ({} bytes)", path.display(), source.len());
                Ok(source)
            }
        }
    }

    /// Read one of the static fragments verbatim.
    fn read_fragment(&self, name: &str) -> Result<String> {
        let path = self.includes_dir().join(name);
        match fs::read_to_string(&path) {
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                bail!("template fragment not found: {}", path.display())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
            Ok(s) => Ok(s),
        }
    }

    /// Render the whole page: header, sectioned body, sidebar, footer.
    pub fn render_page<W: Write>(&self, dest: &mut W) -> Result<()> {
        let source = self.read_source()?;
        let (body, nav) = markdown::render(&source, &self.config.table_class);
        if nav.is_empty() {
            log::info!("no top-level headings; the sidebar will be empty");
        } else {
            log::info!(
                "{} sections, {} subsections",
                nav.len(),
                nav.child_count()
            );
        }

        // Produce every part before writing anything.
        let header = self.read_fragment(HEADER)?;
        let footer = self.read_fragment(FOOTER)?;
        let sidebar = self.tmpls.get_template(SIDEBAR).map_err(|e| {
            let path = self.includes_dir().join(SIDEBAR);
            match e.kind() {
                minijinja::ErrorKind::TemplateNotFound => {
                    anyhow::anyhow!("template fragment not found: {}", path.display())
                }
                _ => anyhow::Error::new(e).context(format!("loading {}", path.display())),
            }
        })?;

        let sidebar = sidebar
            .render(minijinja::context! {
                headings => nav.sections(),
            })
            .with_context(|| format!("rendering {SIDEBAR}"))?;

        dest.write_all(header.as_bytes())?;
        dest.write_all(body.as_bytes())?;
        dest.write_all(sidebar.as_bytes())?;
        dest.write_all(footer.as_bytes())?;

        Ok(())
    }

    /// Render the page and atomically replace the output file with it.
    pub fn build(&self) -> Result<PathBuf> {
        let mut page: Vec<u8> = vec![];
        self.render_page(&mut page)?;

        let dest = self.output_path();
        write_atomic(&dest, &page)?;
        log::info!("wrote {} ({} bytes)", dest.display(), page.len());
        Ok(dest)
    }

    /// Write the built-in fragments into the includes directory, leaving any
    /// existing files alone. Returns the paths that were written.
    pub fn init_fragments(&self) -> Result<Vec<PathBuf>> {
        let dir = self.includes_dir();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let mut written = vec![];
        for (name, contents) in FRAGMENTS.load_all() {
            let dest = dir.join(name);
            if dest.exists() {
                log::info!("keeping existing {}", dest.display());
                continue;
            }
            let contents = contents.with_context(|| format!("loading default {name}"))?;
            write_atomic(&dest, contents.as_bytes())?;
            log::info!("wrote {}", dest.display());
            written.push(dest);
        }
        Ok(written)
    }
}

/// Replace `dest` with `contents` by writing a temporary file next to it and
/// renaming it into place, so readers never see a partial file. An existing
/// file's permissions carry over.
fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let existing = match fs::metadata(dest) {
        Ok(meta) => Some(meta.permissions()),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("reading metadata of {}", dest.display())),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    match existing {
        Some(perms) => tmp.as_file().set_permissions(perms)?,
        #[cfg(unix)]
        None => {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        #[cfg(not(unix))]
        None => (),
    }

    tmp.persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("writing {}", dest.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// A project directory with the default fragments and the given source.
    fn project(source: Option<&str>) -> (TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Config::default());
        ctx.init_fragments().unwrap();
        if let Some(source) = source {
            fs::write(ctx.source_path(), source).unwrap();
        }
        (dir, ctx)
    }

    fn render(ctx: &Context) -> String {
        let mut buf = vec![];
        ctx.render_page(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn page_layout() {
        let (_dir, ctx) = project(Some("# Intro\ntext\n## Setup\nmore\n"));
        let page = render(&ctx);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.trim_end().ends_with("</html>"));

        let body = page.find("<h1 class=\"section-title\" id=\"intro\">Intro</h1>");
        let sidebar = page.find("id=\"doc-menu\"");
        assert!(body.is_some() && sidebar.is_some());
        assert!(body < sidebar);
        assert!(page.contains("href=\"#intro\">Intro</a>"));
        assert!(page.contains("href=\"#setup\">Setup</a>"));
    }

    #[test]
    fn sections_balance() {
        let (_dir, ctx) = project(Some("intro\n# A\n## B\n# C\ntext\n"));
        let page = render(&ctx);
        assert_eq!(
            page.matches("<section").count(),
            page.matches("</section>").count()
        );
        assert_eq!(
            page.matches("<div").count(),
            page.matches("</div>").count()
        );
    }

    #[test]
    fn sidebar_text_not_escaped() {
        let (_dir, ctx) = project(Some("# API & Usage\n"));
        let page = render(&ctx);
        assert!(page.contains("href=\"#api-amp-usage\">API &amp; Usage</a>"));
    }

    #[test]
    fn empty_sidebar() {
        let (_dir, ctx) = project(Some("no headings here\n"));
        let page = render(&ctx);
        assert!(!page.contains("nav-item"));
        assert!(page.contains("<p>no headings here</p>"));
    }

    #[test]
    fn missing_source() {
        let (_dir, ctx) = project(None);
        let err = ctx.build().unwrap_err();
        assert!(format!("{err}").starts_with("source not found: "));
        assert!(!ctx.output_path().exists());
    }

    #[test]
    fn missing_footer() {
        let (_dir, ctx) = project(Some("# A\n"));
        fs::remove_file(ctx.includes_dir().join(FOOTER)).unwrap();
        let err = ctx.build().unwrap_err();
        assert!(format!("{err}").starts_with("template fragment not found: "));
        assert!(format!("{err}").ends_with(FOOTER));
    }

    #[test]
    fn missing_sidebar() {
        let (_dir, ctx) = project(Some("# A\n"));
        fs::remove_file(ctx.includes_dir().join(SIDEBAR)).unwrap();
        let err = ctx.build().unwrap_err();
        assert!(format!("{err}").starts_with("template fragment not found: "));
    }

    #[test]
    fn build_replaces_output() {
        let (_dir, ctx) = project(Some("# A\n"));
        fs::write(ctx.output_path(), "old contents that are much longer than the page").unwrap();
        let dest = ctx.build().unwrap();
        let page = fs::read_to_string(dest).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(!page.contains("old contents"));
    }

    #[test]
    fn build_is_reproducible() {
        let (_dir, ctx) = project(Some("# A\n## B\n| x |\n|---|\n| 1 |\n"));
        let first = fs::read(ctx.build().unwrap()).unwrap();
        let second = fs::read(ctx.build().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn init_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Config::default());
        fs::create_dir_all(ctx.includes_dir()).unwrap();
        fs::write(ctx.includes_dir().join(HEADER), "<mine>").unwrap();

        let written = ctx.init_fragments().unwrap();
        assert_eq!(
            written,
            [
                ctx.includes_dir().join(SIDEBAR),
                ctx.includes_dir().join(FOOTER)
            ]
        );
        assert_eq!(
            fs::read_to_string(ctx.includes_dir().join(HEADER)).unwrap(),
            "<mine>"
        );
    }

    #[test]
    fn atomic_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.html");
        write_atomic(&dest, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
        // No temporary files left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn atomic_write_bad_parent() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        fs::write(&plain, "not a directory").unwrap();
        let err = write_atomic(&plain.join("out.html"), b"hello").unwrap_err();
        assert!(format!("{err}").starts_with("reading metadata of "));
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh.html");
        write_atomic(&fresh, b"a").unwrap();
        assert_eq!(fs::metadata(&fresh).unwrap().permissions().mode() & 0o777, 0o644);

        let kept = dir.path().join("kept.html");
        fs::write(&kept, "old").unwrap();
        fs::set_permissions(&kept, fs::Permissions::from_mode(0o600)).unwrap();
        write_atomic(&kept, b"new").unwrap();
        assert_eq!(fs::metadata(&kept).unwrap().permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn sidebar_error_writes_nothing() {
        let (_dir, ctx) = project(Some("# A\n"));
        fs::write(
            ctx.includes_dir().join(SIDEBAR),
            "{% for s in headings %}{{ no_such_function(s) }}{% endfor %}",
        )
        .unwrap();
        let mut buf = vec![];
        let err = ctx.render_page(&mut buf).unwrap_err();
        assert!(format!("{err}").starts_with("rendering "));
        assert!(buf.is_empty());
    }
}
