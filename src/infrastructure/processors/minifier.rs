use crate::core::config::{HtmlMinifyOptions, JsMinifyOptions};
use crate::core::interfaces::Minifier;
use crate::utils::{PostbuildError, Result};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions as CssParserOptions, StyleSheet},
};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier as AstMinifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;

/// JavaScript minification using oxc
pub struct OxcMinifier {
    options: JsMinifyOptions,
}

impl OxcMinifier {
    pub fn new(options: JsMinifyOptions) -> Self {
        Self { options }
    }

    fn minifier_options(&self) -> MinifierOptions {
        MinifierOptions {
            mangle: self.options.mangle.then(MangleOptions::default),
            compress: self.options.compress.then(|| CompressOptions {
                drop_console: self.options.drop_console,
                drop_debugger: self.options.drop_debugger,
                ..CompressOptions::default()
            }),
        }
    }
}

impl Default for OxcMinifier {
    fn default() -> Self {
        Self::new(JsMinifyOptions::default())
    }
}

impl Minifier for OxcMinifier {
    fn name(&self) -> &str {
        "oxc"
    }

    fn minify(&self, source_code: &str, path: &Path) -> Result<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_default();

        // Parse the source code
        let parse_result = Parser::new(&allocator, source_code, source_type).parse();

        if parse_result.panicked || !parse_result.errors.is_empty() {
            let errors: Vec<String> = parse_result
                .errors
                .iter()
                .map(|e| format!("Parse error: {}", e))
                .collect();
            return Err(PostbuildError::minify_at(errors.join("\n"), path));
        }

        // Minify the AST
        let mut program = parse_result.program;
        let minified = AstMinifier::new(self.minifier_options()).minify(&allocator, &mut program);

        // Generate minified code
        let code = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        Ok(code)
    }
}

/// HTML minification using minify-html
pub struct HtmlMinifier {
    options: HtmlMinifyOptions,
}

impl HtmlMinifier {
    pub fn new(options: HtmlMinifyOptions) -> Self {
        Self { options }
    }

    fn cfg(&self) -> minify_html::Cfg {
        minify_html::Cfg {
            minify_css: self.options.minify_css,
            minify_js: self.options.minify_js,
            keep_comments: !self.options.remove_comments,
            keep_closing_tags: self.options.keep_closing_tags,
            keep_html_and_head_opening_tags: self.options.keep_html_and_head_opening_tags,
            do_not_minify_doctype: self.options.keep_doctype,
            ..minify_html::Cfg::default()
        }
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new(HtmlMinifyOptions::default())
    }
}

impl Minifier for HtmlMinifier {
    fn name(&self) -> &str {
        "minify-html"
    }

    fn minify(&self, html: &str, path: &Path) -> Result<String> {
        let result = minify_html::minify(html.as_bytes(), &self.cfg());
        String::from_utf8(result)
            .map_err(|_| PostbuildError::minify_at("minification produced invalid UTF-8", path))
    }
}

/// CSS minification using Lightning CSS
pub struct LightningCssMinifier {
    minify: bool,
}

impl LightningCssMinifier {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }
}

impl Default for LightningCssMinifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Minifier for LightningCssMinifier {
    fn name(&self) -> &str {
        "lightningcss"
    }

    fn minify(&self, content: &str, path: &Path) -> Result<String> {
        let mut stylesheet = StyleSheet::parse(content, CssParserOptions::default())
            .map_err(|e| PostbuildError::minify_at(format!("CSS parse error: {}", e), path))?;

        if self.minify {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| PostbuildError::minify_at(format!("CSS minify error: {}", e), path))?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..Default::default()
            })
            .map_err(|e| PostbuildError::minify_at(format!("CSS print error: {}", e), path))?;

        Ok(result.code)
    }
}
