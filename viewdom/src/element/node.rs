/// An element's own data: tag, identity, classes and attributes.
///
/// Tree structure (parent, children) lives in the [`Document`](crate::Document),
/// not here, so an element can be moved between parents without cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Remaining attributes in insertion order.
    pub attributes: Vec<(String, String)>,
}

impl Default for Element {
    fn default() -> Self {
        Self::new("div")
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class. Duplicates are ignored.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add every whitespace-separated class in `classes`.
    pub fn class_list(self, classes: &str) -> Self {
        classes
            .split_whitespace()
            .fold(self, |element, class| element.class(class))
    }

    /// Set an attribute. `id` and `class` are routed to their dedicated fields.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "id" => self.id = Some(value),
            "class" => {
                self.classes.clear();
                for class in value.split_whitespace() {
                    if !self.has_class(class) {
                        self.classes.push(class.to_string());
                    }
                }
            }
            _ => {
                if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
                    slot.1 = value;
                } else {
                    self.attributes.push((name, value));
                }
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute by name, including `id` and `class`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "class" => None,
            _ => self
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
        }
    }
}

/// Content stored at a document slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}
