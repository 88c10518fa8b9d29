//! Indented debug dumps of a subtree

use std::io;

use super::{Node, NodeRef};

impl<N: Node> NodeRef<'_, N> {
    /// Write `prefix` + kind name for this node, then dump each populated
    /// child depth-first with one more indent unit of prefix.
    ///
    /// The indent unit comes from the parser's
    /// [`TreeConfig`](crate::TreeConfig). Debugging aid only.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use exprtree::{BasicIntrospector, Kind, KindTable, Node, Parser};
    ///
    /// struct Tag(u16);
    ///
    /// impl Node for Tag {
    ///     fn kind(&self) -> Kind {
    ///         Kind(self.0)
    ///     }
    /// }
    ///
    /// let parser = Parser::new(
    ///     Arc::new(KindTable::new(["Script", "Number"])),
    ///     BasicIntrospector::shared(),
    /// );
    /// let mut ast = parser.tree();
    /// let root = ast.create(Tag(0));
    /// let num = ast.create(Tag(1));
    /// ast.add_child(root, num, 0).unwrap();
    ///
    /// let out = ast.node(root).unwrap().dump_to_string("");
    /// assert_eq!(out, "Script\n Number\n");
    /// ```
    pub fn dump<W: io::Write + ?Sized>(self, prefix: &str, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}{}", prefix, self)?;

        let nested = format!("{}{}", prefix, self.parser().config().indent);
        for child in self.children() {
            child.dump(&nested, out)?;
        }
        Ok(())
    }

    /// [`dump`](Self::dump) into a string.
    pub fn dump_to_string(self, prefix: &str) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.dump(prefix, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// [`dump`](Self::dump) to standard error.
    pub fn dump_to_stderr(self, prefix: &str) -> io::Result<()> {
        self.dump(prefix, &mut io::stderr().lock())
    }
}
