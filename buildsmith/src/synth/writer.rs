//! Indenting line writer for the emitted source.

const NEWLINE: &str = "\n";
const INDENT: &str = "    ";

pub(super) struct SourceWriter {
    buffer: String,
    indent: usize,
    after_open: bool,
}

impl SourceWriter {
    #[expect(
        clippy::missing_const_for_fn,
        reason = "avoid relying on const-stability details for allocation constructors"
    )]
    pub(super) fn new() -> Self {
        Self {
            buffer: String::new(),
            indent: 0,
            after_open: true,
        }
    }

    pub(super) fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(line);
        self.buffer.push_str(NEWLINE);
        self.after_open = false;
    }

    pub(super) fn lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            self.line(line);
        }
    }

    /// Write `{` and indent.
    pub(super) fn open(&mut self) {
        self.line("{");
        self.indent += 1;
        self.after_open = true;
    }

    /// Outdent and write `}` followed by `suffix`.
    pub(super) fn close_with(&mut self, suffix: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(&format!("}}{suffix}"));
    }

    pub(super) fn close(&mut self) {
        self.close_with("");
    }

    pub(super) const fn indent(&mut self) {
        self.indent += 1;
    }

    pub(super) const fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Separate two members with a blank line, unless a block just opened.
    pub(super) fn gap(&mut self) {
        if !self.after_open {
            self.buffer.push_str(NEWLINE);
            self.after_open = true;
        }
    }

    pub(super) fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_are_indented() {
        let mut writer = SourceWriter::new();
        writer.line("class A");
        writer.open();
        writer.gap();
        writer.line("int x;");
        writer.gap();
        writer.line("void F()");
        writer.open();
        writer.close();
        writer.close();
        assert_eq!(
            writer.finish(),
            "class A\n{\n    int x;\n\n    void F()\n    {\n    }\n}\n"
        );
    }
}
