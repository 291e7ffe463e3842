use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    #[error("xml syntax error: {0}")]
    Syntax(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("unclosed element {0}")]
    Unclosed(String),
    #[error("content after root element")]
    TrailingContent,
}

/// One element of a parsed document. `text` is the element's own character
/// data (text and CDATA, concatenated), kept exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(XmlError::TrailingContent);
                    }
                    stack.push(XmlElement {
                        name: element_name(start.name().as_ref())?,
                        ..Default::default()
                    });
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(XmlError::TrailingContent);
                    }
                    let element = XmlElement {
                        name: element_name(start.name().as_ref())?,
                        ..Default::default()
                    };
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Syntax("unexpected end tag".to_string()))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| XmlError::Syntax(e.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None if root.is_some() => return Err(XmlError::TrailingContent),
                        None => return Err(XmlError::NoRoot),
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| XmlError::Syntax(e.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&text),
                        None => return Err(XmlError::Syntax("cdata outside root".to_string())),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.ok_or(XmlError::NoRoot)
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every direct child called `name`, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn element_name(raw: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| XmlError::Syntax(e.to_string()))
}

/// Wraps `value` in a CDATA section. Any `]]>` inside the value is split
/// across two sections so the text survives a parse unchanged.
pub fn cdata(value: &str) -> String {
    format!("<![CDATA[{}]]>", value.replace("]]>", "]]]]><![CDATA[>"))
}

pub fn escape_text(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
