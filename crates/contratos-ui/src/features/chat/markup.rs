//! Light markdown for assistant replies.
//!
//! Replies are split into typed segments and rendered as text nodes, so no
//! server-provided markup ever reaches the DOM as HTML.

/// Rendered piece of an assistant reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// `**bold**`.
    Bold(String),
    /// `*italic*`.
    Italic(String),
    /// `` `code` ``.
    Code(String),
    /// Bare `http(s)://` URL.
    Link(String),
    /// Newline.
    LineBreak,
}

/// Split `text` into segments.
#[must_use]
pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            segments.push(Segment::LineBreak);
        }
        parse_line(line.trim_end_matches('\r'), &mut segments);
    }
    segments
}

fn parse_line(line: &str, out: &mut Vec<Segment>) {
    let mut plain = String::new();
    let mut rest = line;
    while let Some(ch) = rest.chars().next() {
        if let Some((segment, consumed)) = inline(rest) {
            flush(&mut plain, out);
            out.push(segment);
            rest = &rest[consumed..];
        } else {
            plain.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    flush(&mut plain, out);
}

fn inline(rest: &str) -> Option<(Segment, usize)> {
    if rest.starts_with("http://") || rest.starts_with("https://") {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        return Some((Segment::Link(rest[..end].to_string()), end));
    }
    delimited(rest, "**")
        .map(|(inner, used)| (Segment::Bold(inner), used))
        .or_else(|| delimited(rest, "*").map(|(inner, used)| (Segment::Italic(inner), used)))
        .or_else(|| delimited(rest, "`").map(|(inner, used)| (Segment::Code(inner), used)))
}

fn delimited(rest: &str, marker: &str) -> Option<(String, usize)> {
    let body = rest.strip_prefix(marker)?;
    let close = body.find(marker)?;
    if close == 0 {
        return None;
    }
    Some((body[..close].to_string(), marker.len() * 2 + close))
}

fn flush(plain: &mut String, out: &mut Vec<Segment>) {
    if !plain.is_empty() {
        out.push(Segment::Text(std::mem::take(plain)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_markup_becomes_segments() {
        let segments = parse("Veja **isto** e `cfg`\nhttps://exemplo.gov.br fim");
        assert_eq!(
            segments,
            vec![
                Segment::Text("Veja ".into()),
                Segment::Bold("isto".into()),
                Segment::Text(" e ".into()),
                Segment::Code("cfg".into()),
                Segment::LineBreak,
                Segment::Link("https://exemplo.gov.br".into()),
                Segment::Text(" fim".into()),
            ]
        );
    }

    #[test]
    fn italic_and_unclosed_markers() {
        assert_eq!(
            parse("um *dois* três"),
            vec![
                Segment::Text("um ".into()),
                Segment::Italic("dois".into()),
                Segment::Text(" três".into()),
            ]
        );
        assert_eq!(parse("2 * 3"), vec![Segment::Text("2 * 3".into())]);
    }

    #[test]
    fn html_stays_text() {
        assert_eq!(
            parse("<script>alert(1)</script>"),
            vec![Segment::Text("<script>alert(1)</script>".into())]
        );
    }
}
