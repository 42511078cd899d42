use std::path::Path;

use minijinja::{AutoEscape, Environment, context};

use crate::chapter::PARAGRAPH_BREAK;
use crate::error::{Error, Result};

pub const CHAPTER_TEMPLATE_FILE: &str = "chapter_template.html";
pub const NOVEL_TEMPLATE_FILE: &str = "novel_template.html";

const DEFAULT_CHAPTER_TEMPLATE: &str = r#"<article class="chapter">
  <h2 class="chapter-title">{{ chapter_title }}</h2>
  <div class="chapter-body">
    {{ chapter_body }}
  </div>
</article>
"#;

const DEFAULT_NOVEL_TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{{ novel_title }}</title>
  </head>
  <body>
    <h1>{{ novel_title }}</h1>
{% for chapter_html in chapter_htmls %}{{ chapter_html }}
{% endfor %}  </body>
</html>
"#;

/// Chapter and collection templates (Jinja syntax).
///
/// The chapter template sees `chapter_title` and `chapter_body`; the novel
/// template sees `novel_title` and the ordered list `chapter_htmls`. Values
/// are escaped before rendering, so auto-escaping is off.
#[derive(Debug, Clone)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn builtin() -> Result<Self> {
        let mut env = environment();
        env.add_template(CHAPTER_TEMPLATE_FILE, DEFAULT_CHAPTER_TEMPLATE)
            .map_err(|err| template_error(CHAPTER_TEMPLATE_FILE, err))?;
        env.add_template(NOVEL_TEMPLATE_FILE, DEFAULT_NOVEL_TEMPLATE)
            .map_err(|err| template_error(NOVEL_TEMPLATE_FILE, err))?;
        Ok(Self { env })
    }

    /// Loads `chapter_template.html` and `novel_template.html` from `dir`.
    /// Syntax errors are reported here, not at render time.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut env = environment();
        for name in [CHAPTER_TEMPLATE_FILE, NOVEL_TEMPLATE_FILE] {
            let path = dir.join(name);
            let source = std::fs::read_to_string(&path).map_err(|err| Error::Template {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            env.add_template_owned(name, source)
                .map_err(|err| template_error(&path, err))?;
        }
        Ok(Self { env })
    }

    /// `body` is plain text split by [`PARAGRAPH_BREAK`]; each paragraph is
    /// escaped, the separators are kept as markup.
    pub fn render_chapter(&self, title: &str, body: &str) -> Result<String> {
        let chapter_title = html_escape::encode_text(title);
        let chapter_body = body
            .split(PARAGRAPH_BREAK)
            .map(|paragraph| html_escape::encode_text(paragraph).into_owned())
            .collect::<Vec<_>>()
            .join(PARAGRAPH_BREAK);
        self.render(
            CHAPTER_TEMPLATE_FILE,
            context! { chapter_title, chapter_body },
        )
    }

    pub fn render_novel(
        &self,
        novel_title: &str,
        chapter_documents: &[String],
    ) -> Result<String> {
        let novel_title = html_escape::encode_text(novel_title);
        self.render(
            NOVEL_TEMPLATE_FILE,
            context! { novel_title, chapter_htmls => chapter_documents },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|source| Error::Render {
                name: name.to_owned(),
                source,
            })
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

fn template_error(path: impl AsRef<Path>, err: minijinja::Error) -> Error {
    Error::Template {
        path: path.as_ref().to_path_buf(),
        reason: err.to_string(),
    }
}
