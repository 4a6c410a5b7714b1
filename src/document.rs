use crate::domain::constants;
use crate::domain::models::MapType;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid XML in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: roxmltree::Error,
    },
    #[error("no <Decorations> element in {0}")]
    MissingRoot(String),
}

/// One placed item. All attributes are carried verbatim and in order so that
/// position data and anything else the game writes survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub attrs: Vec<(String, String)>,
}

impl Prop {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> &str {
        self.attr("name").unwrap_or("")
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn set_id(&mut self, id: u64) {
        set_attr(&mut self.attrs, "id", &id.to_string());
    }
}

/// Direct children of the `<Decorations>` element. Comments are the merge
/// tool's group markers and must survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Prop(Prop),
    Comment(String),
}

/// Owned model of one Decorations document.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationDoc {
    pub file_name: String,
    declaration: Option<String>,
    pub root_attrs: Vec<(String, String)>,
    pub nodes: Vec<Node>,
}

impl DecorationDoc {
    pub fn from_str(file_name: &str, xml: &str) -> Result<Self, DocumentError> {
        let parsed = roxmltree::Document::parse(xml).map_err(|source| DocumentError::Parse {
            path: file_name.to_string(),
            source,
        })?;
        let root = parsed
            .descendants()
            .find(|n| n.has_tag_name("Decorations"))
            .ok_or_else(|| DocumentError::MissingRoot(file_name.to_string()))?;

        let root_attrs = root
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        let mut nodes = Vec::new();
        for child in root.children() {
            if child.is_comment() {
                nodes.push(Node::Comment(child.text().unwrap_or("").to_string()));
            } else if child.is_element() && child.has_tag_name("prop") {
                let attrs = child
                    .attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect();
                nodes.push(Node::Prop(Prop { attrs }));
            }
        }

        let declaration = xml.trim_start().starts_with("<?xml").then(|| {
            let trimmed = xml.trim_start();
            match trimmed.find("?>") {
                Some(end) => trimmed[..end + 2].to_string(),
                None => String::new(),
            }
        });

        Ok(DecorationDoc {
            file_name: file_name.to_string(),
            declaration: declaration.filter(|d| !d.is_empty()),
            root_attrs,
            nodes,
        })
    }

    pub fn map_id(&self) -> Option<&str> {
        self.root_attr("mapId")
    }

    pub fn type_flag(&self) -> Option<&str> {
        self.root_attr("type")
    }

    fn root_attr(&self, key: &str) -> Option<&str> {
        self.root_attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_root_attr(&mut self, key: &str, value: &str) {
        set_attr(&mut self.root_attrs, key, value);
    }

    /// The `type` attribute wins; otherwise the `mapId` is resolved against
    /// the authoritative map table.
    pub fn detect_map_type(&self) -> Option<MapType> {
        if let Some(t) = self.type_flag().and_then(MapType::from_flag) {
            return Some(t);
        }
        self.map_id()
            .and_then(constants::map_by_id)
            .map(|m| m.map_type)
    }

    pub fn props(&self) -> Vec<&Prop> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Prop(p) => Some(p),
                Node::Comment(_) => None,
            })
            .collect()
    }

    pub fn prop_count(&self) -> usize {
        self.props().len()
    }

    /// Pretty-printed serialization, two-space indent, self-closing props.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(decl) = &self.declaration {
            out.push_str(decl);
            out.push('\n');
        }
        out.push_str("<Decorations");
        for (k, v) in &self.root_attrs {
            out.push_str(&format!(" {}=\"{}\"", k, escape_attr(v)));
        }
        out.push_str(">\n");
        for node in &self.nodes {
            match node {
                Node::Prop(p) => {
                    out.push_str("  <prop");
                    for (k, v) in &p.attrs {
                        out.push_str(&format!(" {}=\"{}\"", k, escape_attr(v)));
                    }
                    out.push_str("/>\n");
                }
                Node::Comment(text) => {
                    out.push_str(&format!("  <!--{}-->\n", text));
                }
            }
        }
        out.push_str("</Decorations>\n");
        out
    }
}

/// Reads and parses a document, returning the raw bytes as well so callers
/// can fingerprint exactly what was parsed.
pub fn load(path: &Path) -> Result<(DecorationDoc, Vec<u8>), DocumentError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let doc = DecorationDoc::from_str(&file_name, &text)?;
    Ok((doc, bytes))
}

fn set_attr(attrs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match attrs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => attrs.push((key.to_string(), value.to_string())),
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Output name for a swapped document: input stem plus a suffix derived from
/// the target map name (apostrophes dropped, other punctuation mapped to
/// dashes, runs collapsed).
pub fn output_file_name(input: &str, map_name: &str) -> String {
    let base = input
        .strip_suffix(".xml")
        .or_else(|| input.strip_suffix(".XML"))
        .unwrap_or(input);
    format!("{}{}.xml", base, map_name_suffix(map_name))
}

fn map_name_suffix(map_name: &str) -> String {
    let mut cleaned = String::new();
    for c in map_name.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            cleaned.push(c);
        } else if !cleaned.ends_with('-') {
            cleaned.push('-');
        }
    }
    format!("_{}", cleaned.trim_matches('-'))
}
