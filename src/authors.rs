//! Beamer author frames from an `AUTHORS` file.
//!
//! ```text
//! Ondřej Čertík <ondrej@certik.cz>      ─┐
//! *Fredrik Johansson <fredrik@...>       ├─▶  \begin{frame}{Authors}
//! Some note without an address           ┘    \begin{multicols}{5}
//!                                             \tiny
//!                                             Ondřej Čertík\\
//!                                             Fredrik Johansson\\
//!                                             \end{multicols}
//!                                             \end{frame}
//! ```

/// Layout of the generated frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Authors per frame, at least 1.
    pub batch: usize,
    /// `multicols` column count.
    pub columns: usize,
}

/// Display names from AUTHORS content, in file order.
///
/// Only lines ending in `>` (after trimming) name an author. The name is the
/// text before the first `<`, with one leading `*` removed.
pub fn parse_authors(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.trim().ends_with('>'))
        .map(|line| {
            let name = line.split('<').next().unwrap_or_default().trim();
            name.strip_prefix('*').unwrap_or(name).to_string()
        })
        .collect()
}

/// Render the frames. No authors means an empty document.
pub fn render_frames(authors: &[String], layout: FrameLayout) -> String {
    let mut out = String::new();
    for (i, chunk) in authors.chunks(layout.batch.max(1)).enumerate() {
        let title = if i == 0 { "Authors" } else { "Authors (continued)" };
        out.push_str(&format!("\\begin{{frame}}{{{title}}}\n"));
        out.push_str(&format!("\\begin{{multicols}}{{{}}}\n", layout.columns));
        out.push_str("\\tiny\n");
        for name in chunk {
            out.push_str(&format!("{name}\\\\\n"));
        }
        out.push_str("\\end{multicols}\n");
        out.push_str("\\end{frame}\n");
    }
    out
}

/// Number of frames `render_frames` produces.
pub fn frame_count(authors: usize, batch: usize) -> usize {
    authors.div_ceil(batch.max(1))
}
