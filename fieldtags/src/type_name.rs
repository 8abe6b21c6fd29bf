//! Readable type strings from token-stream renderings.

/// Re-spaces a rendered type so it reads the way it is usually written.
///
/// `Option < Vec < u8 > >` becomes `Option<Vec<u8>>` and
/// `HashMap < String , u32 >` becomes `HashMap<String, u32>`. The result does
/// not depend on how the input was spaced.
pub fn tidy(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev = Prev::Start;

    for token in tokens(raw) {
        match token {
            "," | ";" => {
                out.push_str(token);
                prev = Prev::Separator;
            }
            "+" | "->" | "=" => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(token);
                prev = Prev::Separator;
            }
            _ => {
                let word = is_word(token);
                let space = match prev {
                    Prev::Separator => !token.starts_with([')', ']', '>']),
                    Prev::Word => word,
                    Prev::Start | Prev::Punct => false,
                };
                if space {
                    out.push(' ');
                }
                out.push_str(token);
                prev = if word { Prev::Word } else { Prev::Punct };
            }
        }
    }

    out
}

#[derive(Clone, Copy)]
enum Prev {
    Start,
    Word,
    Punct,
    Separator,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word(token: &str) -> bool {
    token.starts_with(|c: char| is_word_char(c) || c == '\'')
}

/// Identifiers, lifetimes, `::`, `->` and single punctuation characters.
fn tokens(raw: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let mut end = start + c.len_utf8();
        let starts_word = is_word_char(c) || (c == '\'' && chars.peek().is_some_and(|&(_, n)| is_word_char(n)));

        if starts_word {
            while let Some(&(i, n)) = chars.peek() {
                if !is_word_char(n) {
                    break;
                }
                end = i + n.len_utf8();
                chars.next();
            }
        } else if let Some(&(i, n)) = chars.peek()
            && ((c == '-' && n == '>') || (c == ':' && n == ':'))
        {
            end = i + n.len_utf8();
            chars.next();
        }

        out.push(&raw[start..end]);
    }

    out
}
