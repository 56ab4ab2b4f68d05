//! Minimal XML-RPC client.
//!
//! Covers the value types WordPress exchanges: scalars, base64 blobs,
//! arrays and structs. Requests are built as strings, responses are read
//! with quick-xml's event reader.

use crate::error::XmlRpcError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// An XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Double(f64),
    String(String),
    DateTime(String),
    Base64(Vec<u8>),
    Array(Vec<Value>),
    Struct(IndexMap<String, Value>),
    Nil,
}

impl Value {
    /// Member lookup on a struct value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Ints and strings rendered as text; servers disagree on which they send for ids
    pub fn to_id(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Array(items.into_iter().map(Value::String).collect())
    }
}

/// HTTP transport bound to one endpoint
pub struct Client {
    agent: ureq::Agent,
    endpoint: String,
}

impl Client {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.into(),
        }
    }

    /// Perform one call. Faults come back as `XmlRpcError::Fault`.
    pub fn call(&self, method: &str, params: &[Value]) -> Result<Value, XmlRpcError> {
        let body = encode_call(method, params);
        log::debug!("XML-RPC {} -> {} ({} bytes)", method, self.endpoint, body.len());

        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .header("Content-Type", "text/xml")
            .send(body)?;
        let text = response.body_mut().read_to_string()?;

        parse_response(&text)
    }
}

/// Serialize a `methodCall` document
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName><params>");
    for param in params {
        xml.push_str("<param>");
        write_value(&mut xml, param);
        xml.push_str("</param>");
    }
    xml.push_str("</params></methodCall>\n");
    xml
}

fn write_value(xml: &mut String, value: &Value) {
    xml.push_str("<value>");
    match value {
        Value::Int(i) => xml.push_str(&format!("<int>{}</int>", i)),
        Value::Bool(b) => xml.push_str(&format!("<boolean>{}</boolean>", u8::from(*b))),
        Value::Double(d) => xml.push_str(&format!("<double>{}</double>", d)),
        Value::String(s) => xml.push_str(&format!("<string>{}</string>", escape(s.as_str()))),
        Value::DateTime(d) => xml.push_str(&format!(
            "<dateTime.iso8601>{}</dateTime.iso8601>",
            escape(d.as_str())
        )),
        Value::Base64(bytes) => xml.push_str(&format!("<base64>{}</base64>", STANDARD.encode(bytes))),
        Value::Array(items) => {
            xml.push_str("<array><data>");
            for item in items {
                write_value(xml, item);
            }
            xml.push_str("</data></array>");
        }
        Value::Struct(members) => {
            xml.push_str("<struct>");
            for (name, member) in members {
                xml.push_str("<member><name>");
                xml.push_str(&escape(name.as_str()));
                xml.push_str("</name>");
                write_value(xml, member);
                xml.push_str("</member>");
            }
            xml.push_str("</struct>");
        }
        Value::Nil => xml.push_str("<nil/>"),
    }
    xml.push_str("</value>");
}

/// Parse a `methodResponse` document into its single return value
pub fn parse_response(xml: &str) -> Result<Value, XmlRpcError> {
    let mut reader = ResponseReader::new(xml);
    reader.expect_start(b"methodResponse")?;

    match reader.next_tag()? {
        Event::Start(e) if e.name().as_ref() == b"params" => {
            reader.expect_start(b"param")?;
            reader.expect_start(b"value")?;
            reader.read_value()
        }
        Event::Start(e) if e.name().as_ref() == b"fault" => {
            reader.expect_start(b"value")?;
            let fault = reader.read_value()?;
            Err(XmlRpcError::Fault {
                code: fault.get("faultCode").and_then(Value::as_i64).unwrap_or_default(),
                message: fault
                    .get("faultString")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        }
        other => Err(unexpected(b"params", &other)),
    }
}

struct ResponseReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> ResponseReader<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;
        Self { reader }
    }

    /// Next structural event, skipping whitespace and prolog noise
    fn next_tag(&mut self) -> Result<Event<'a>, XmlRpcError> {
        loop {
            match self.reader.read_event()? {
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => return Err(malformed("unexpected end of document")),
                event => return Ok(event),
            }
        }
    }

    fn expect_start(&mut self, name: &[u8]) -> Result<(), XmlRpcError> {
        match self.next_tag()? {
            Event::Start(e) if e.name().as_ref() == name => Ok(()),
            other => Err(unexpected(name, &other)),
        }
    }

    fn expect_end(&mut self, name: &[u8]) -> Result<(), XmlRpcError> {
        match self.next_tag()? {
            Event::End(e) if e.name().as_ref() == name => Ok(()),
            other => Err(unexpected(name, &other)),
        }
    }

    /// Character data up to `</end>`
    fn read_text(&mut self, end: &[u8]) -> Result<String, XmlRpcError> {
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => text.push_str(&String::from_utf8_lossy(&t)),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::GeneralRef(r) => text.push_str(&resolve_entity(&String::from_utf8_lossy(&r))?),
                Event::Comment(_) => {}
                Event::End(e) if e.name().as_ref() == end => return Ok(text),
                other => return Err(unexpected(end, &other)),
            }
        }
    }

    /// Body of a `<value>` whose start tag has been consumed, through `</value>`
    fn read_value(&mut self) -> Result<Value, XmlRpcError> {
        // A value without a type element is a string
        let mut untyped = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => untyped.push_str(&String::from_utf8_lossy(&t)),
                Event::CData(c) => untyped.push_str(&String::from_utf8_lossy(&c)),
                Event::GeneralRef(r) => {
                    untyped.push_str(&resolve_entity(&String::from_utf8_lossy(&r))?)
                }
                Event::Comment(_) => {}
                Event::End(e) if e.name().as_ref() == b"value" => return Ok(Value::String(untyped)),
                Event::Start(e) => {
                    let tag = e.name().as_ref().to_vec();
                    let value = self.read_typed(&tag)?;
                    self.expect_end(b"value")?;
                    return Ok(value);
                }
                other => return Err(unexpected(b"value", &other)),
            }
        }
    }

    fn read_typed(&mut self, tag: &[u8]) -> Result<Value, XmlRpcError> {
        match tag {
            b"string" => Ok(Value::String(self.read_text(tag)?)),
            b"int" | b"i4" | b"i8" => {
                let text = self.read_text(tag)?;
                text.trim()
                    .parse()
                    .map(Value::Int)
                    .map_err(|_| malformed(format!("invalid integer: {}", text)))
            }
            b"boolean" => match self.read_text(tag)?.trim() {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                other => Err(malformed(format!("invalid boolean: {}", other))),
            },
            b"double" => {
                let text = self.read_text(tag)?;
                text.trim()
                    .parse()
                    .map(Value::Double)
                    .map_err(|_| malformed(format!("invalid double: {}", text)))
            }
            b"dateTime.iso8601" => Ok(Value::DateTime(self.read_text(tag)?.trim().to_string())),
            b"base64" => {
                let text = self.read_text(tag)?;
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                Ok(Value::Base64(STANDARD.decode(compact)?))
            }
            b"nil" => {
                self.expect_end(tag)?;
                Ok(Value::Nil)
            }
            b"array" => {
                self.expect_start(b"data")?;
                let mut items = Vec::new();
                loop {
                    match self.next_tag()? {
                        Event::Start(e) if e.name().as_ref() == b"value" => {
                            items.push(self.read_value()?)
                        }
                        Event::End(e) if e.name().as_ref() == b"data" => break,
                        other => return Err(unexpected(b"value", &other)),
                    }
                }
                self.expect_end(b"array")?;
                Ok(Value::Array(items))
            }
            b"struct" => {
                let mut members = IndexMap::new();
                loop {
                    match self.next_tag()? {
                        Event::Start(e) if e.name().as_ref() == b"member" => {
                            self.expect_start(b"name")?;
                            let name = self.read_text(b"name")?;
                            self.expect_start(b"value")?;
                            let value = self.read_value()?;
                            self.expect_end(b"member")?;
                            members.insert(name, value);
                        }
                        Event::End(e) if e.name().as_ref() == b"struct" => break,
                        other => return Err(unexpected(b"member", &other)),
                    }
                }
                Ok(Value::Struct(members))
            }
            other => Err(malformed(format!(
                "unknown value type <{}>",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

fn resolve_entity(entity: &str) -> Result<String, XmlRpcError> {
    let resolved = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => entity
            .strip_prefix("#x")
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };

    resolved
        .map(String::from)
        .ok_or_else(|| malformed(format!("unknown entity &{};", entity)))
}

fn malformed(msg: impl Into<String>) -> XmlRpcError {
    XmlRpcError::Malformed(msg.into())
}

fn unexpected(expected: &[u8], found: &Event) -> XmlRpcError {
    malformed(format!(
        "expected <{}>, found {:?}",
        String::from_utf8_lossy(expected),
        found
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(value: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<methodResponse>\n  <params>\n    <param>\n      <value>{}</value>\n    </param>\n  </params>\n</methodResponse>\n",
            value
        )
    }

    #[test]
    fn test_encode_call_escapes_and_nests() {
        let mut members = IndexMap::new();
        members.insert("name".to_string(), Value::from("a&b.png"));
        members.insert("bits".to_string(), Value::Base64(b"hi".to_vec()));
        members.insert("overwrite".to_string(), Value::from(false));
        let xml = encode_call("wp.uploadFile", &[Value::from(0), Value::Struct(members)]);

        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<methodName>wp.uploadFile</methodName>"));
        assert!(xml.contains("<param><value><int>0</int></value></param>"));
        assert!(xml.contains("<member><name>name</name><value><string>a&amp;b.png</string></value></member>"));
        assert!(xml.contains("<base64>aGk=</base64>"));
        assert!(xml.contains("<boolean>0</boolean>"));
    }

    #[test]
    fn test_encode_array() {
        let xml = encode_call("m", &[Value::from(vec!["a".to_string(), "<b>".to_string()])]);
        assert!(xml.contains(
            "<array><data><value><string>a</string></value><value><string>&lt;b&gt;</string></value></data></array>"
        ));
    }

    #[test]
    fn test_parse_struct_response() {
        let xml = wrap(
            "<struct>\n<member><name>id</name><value><string>42</string></value></member>\n<member><name>url</name><value><string>https://site/a.png?x=1&amp;y=2</string></value></member>\n<member><name>count</name><value><i4>3</i4></value></member>\n</struct>",
        );
        let value = parse_response(&xml).unwrap();

        assert_eq!(value.get("id").and_then(Value::to_id).as_deref(), Some("42"));
        assert_eq!(
            value.get("url").and_then(Value::as_str),
            Some("https://site/a.png?x=1&y=2")
        );
        assert_eq!(value.get("count").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_parse_untyped_value_is_string() {
        assert_eq!(
            parse_response(&wrap("  17 ")).unwrap(),
            Value::String("  17 ".to_string())
        );
        assert_eq!(parse_response(&wrap("")).unwrap(), Value::String(String::new()));
    }

    #[test]
    fn test_parse_scalars_and_arrays() {
        let xml = wrap(
            "<array><data><value><boolean>1</boolean></value><value><double>2.5</double></value><value><base64>aGk=</base64></value><value><nil/></value><value><string/></value></data></array>",
        );
        assert_eq!(
            parse_response(&xml).unwrap(),
            Value::Array(vec![
                Value::Bool(true),
                Value::Double(2.5),
                Value::Base64(b"hi".to_vec()),
                Value::Nil,
                Value::String(String::new()),
            ])
        );
    }

    #[test]
    fn test_parse_fault() {
        let xml = "<?xml version=\"1.0\"?><methodResponse><fault><value><struct><member><name>faultCode</name><value><int>403</int></value></member><member><name>faultString</name><value><string>Incorrect username or password.</string></value></member></struct></value></fault></methodResponse>";
        match parse_response(xml).unwrap_err() {
            XmlRpcError::Fault { code, message } => {
                assert_eq!(code, 403);
                assert_eq!(message, "Incorrect username or password.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_response("<html><body>Not found</body></html>").is_err());
        assert!(parse_response(&wrap("<int>abc</int>")).is_err());
        assert!(parse_response("").is_err());
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").unwrap(), "&");
        assert_eq!(resolve_entity("#65").unwrap(), "A");
        assert_eq!(resolve_entity("#x2019").unwrap(), "\u{2019}");
        assert!(resolve_entity("nbsp").is_err());
    }

    #[test]
    fn test_to_id() {
        assert_eq!(Value::Int(7).to_id().as_deref(), Some("7"));
        assert_eq!(Value::from(" 8 ").to_id().as_deref(), Some("8"));
        assert_eq!(Value::Nil.to_id(), None);
    }
}
