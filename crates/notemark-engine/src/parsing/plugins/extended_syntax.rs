use crate::config::ExtendedSyntax;
use crate::error::ParseResult;
use crate::parsing::ast::{Paragraph, TextOpts};
use crate::parsing::delims::apply_delimiter;

use super::{InlinePlugin, PluginContext};

/// Priority of the first extended syntax; later ones follow in order.
pub const BASE_PRIORITY: i32 = 256;

/// Applies one user-defined delimiter through the pairing engine.
#[derive(Debug, Clone)]
pub struct ExtendedSyntaxPlugin {
    delimiter: String,
    style: TextOpts,
    priority: i32,
}

impl ExtendedSyntaxPlugin {
    /// Plugin for the `n`-th configured syntax.
    pub fn new(syntax: &ExtendedSyntax, n: usize) -> Self {
        Self {
            delimiter: syntax.delimiter.clone(),
            style: syntax.opts(),
            priority: BASE_PRIORITY.saturating_add(i32::try_from(n).unwrap_or(i32::MAX)),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl InlinePlugin for ExtendedSyntaxPlugin {
    fn name(&self) -> &'static str {
        "extended-syntax"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&self, para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()> {
        if ctx.collecting_references {
            return Ok(());
        }
        apply_delimiter(para, ctx.source, &self.delimiter, self.style)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_position() {
        let syntaxes = ExtendedSyntax::defaults();
        let plugins: Vec<_> = syntaxes.iter().enumerate().map(|(n, s)| ExtendedSyntaxPlugin::new(s, n)).collect();
        let priorities: Vec<i32> = plugins.iter().map(|p| p.priority()).collect();
        assert_eq!(priorities, vec![256, 257, 258]);
        assert_eq!(plugins[1].delimiter(), "--");
        assert_eq!(plugins[2].style, TextOpts::extended(2));
    }
}
