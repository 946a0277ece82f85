//! Reading and writing the XML string table format.
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="en_US">
//! <context>
//!     <name>EBus: AudioEngineSoLoudRequestBus</name>
//!     <message id="AUDIOENGINESOLOUDREQUESTBUS_NAME">
//!         <source>AUDIOENGINESOLOUDREQUESTBUS_NAME</source>
//!         <translation>Audio Engine SoLoud Requests</translation>
//!     </message>
//! </context>
//! </TS>
//! ```
//!
//! Only `TS`, `context`, `name`, `message`, `source` and `translation` carry
//! data. Other elements (e.g. `location`, `comment`) are skipped, and
//! declarations, comments and whitespace between elements are dropped. Text
//! content is kept verbatim.

use crate::i18n::{Context, Document, Entry, Language, LoadError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::io::{self, Write};
use tracing::debug;

/// Parse a string table document.
///
/// Duplicate ids are not rejected here; that is the table's job.
pub fn parse_document(xml: &str) -> Result<Document, LoadError> {
    let mut parser = TsParser::new(xml);
    let mut document: Option<Document> = None;

    loop {
        match parser.next()? {
            Event::Start(e) if e.name().as_ref() == b"TS" => {
                if document.is_some() {
                    return Err(unexpected(&e, "document"));
                }
                let (version, language) = parser.root_attributes(&e)?;
                let contexts = parser.contexts()?;
                document = Some(Document {
                    version,
                    language,
                    contexts,
                });
            }
            Event::Empty(e) if e.name().as_ref() == b"TS" => {
                parser.root_attributes(&e)?;
                return Err(LoadError::NoContexts);
            }
            Event::Start(e) | Event::Empty(e) => return Err(unexpected(&e, "document")),
            Event::Text(t) => parser.ignore_whitespace(&t, "document")?,
            Event::CData(_) => {
                return Err(LoadError::UnexpectedText {
                    parent: "document".to_string(),
                    text: "<![CDATA[...]]>".to_string(),
                })
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let document = document.ok_or(LoadError::MissingRoot)?;
    if document.contexts.is_empty() {
        return Err(LoadError::NoContexts);
    }
    Ok(document)
}

/// Serialize a document in normalized form.
///
/// Parsing the output yields a document equal to the input.
pub fn write_document(document: &Document) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_to(document, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serialize a document in normalized form into `out`.
///
/// Contexts sit at the left margin under `TS`; their children are indented
/// by four spaces per level.
pub fn write_to<W: Write>(document: &Document, out: W) -> io::Result<()> {
    let mut writer = Writer::new(out);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.get_mut().write_all(b"\n")?;
    writer.write_event(Event::DocType(BytesText::from_escaped("TS")))?;
    writer.get_mut().write_all(b"\n")?;
    writer.write_event(Event::Start(BytesStart::new("TS").with_attributes([
        ("version", document.version.as_str()),
        ("language", document.language.code()),
    ])))?;
    writer.get_mut().write_all(b"\n")?;

    for context in &document.contexts {
        write_context(&mut Writer::new_with_indent(writer.get_mut(), b' ', 4), context)?;
        writer.get_mut().write_all(b"\n")?;
    }

    writer.write_event(Event::End(BytesEnd::new("TS")))?;
    writer.get_mut().write_all(b"\n")
}

fn write_context<W: Write>(writer: &mut Writer<W>, context: &Context) -> io::Result<()> {
    writer
        .create_element("context")
        .write_inner_content(|writer| {
            writer
                .create_element("name")
                .write_text_content(BytesText::new(&context.name))?;
            for entry in &context.entries {
                writer
                    .create_element("message")
                    .with_attribute(("id", entry.id.as_str()))
                    .write_inner_content(|writer| {
                        writer
                            .create_element("source")
                            .write_text_content(BytesText::new(&entry.source))?;
                        if let Some(translation) = &entry.translation {
                            writer
                                .create_element("translation")
                                .write_text_content(BytesText::new(translation))?;
                        }
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
    Ok(())
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn unexpected(e: &BytesStart, parent: &str) -> LoadError {
    LoadError::UnexpectedElement {
        found: element_name(e),
        parent: parent.to_string(),
    }
}

/// Pull parser over the TS element tree.
struct TsParser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> TsParser<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
        }
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn next(&mut self) -> Result<Event<'a>, LoadError> {
        let position = self.position();
        self.reader
            .read_event()
            .map_err(|e| LoadError::xml(position, e))
    }

    fn ignore_whitespace(&self, text: &BytesText, parent: &str) -> Result<(), LoadError> {
        if text.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        Err(LoadError::UnexpectedText {
            parent: parent.to_string(),
            text: String::from_utf8_lossy(text).trim().to_string(),
        })
    }

    /// Skip an unknown element and everything inside it.
    fn skip(&mut self, start: &BytesStart) -> Result<(), LoadError> {
        debug!(element = %element_name(start), "Skipping element without table data");
        let name = start.name().as_ref().to_vec();
        let position = self.position();
        self.reader
            .read_to_end(QName(&name))
            .map_err(|e| LoadError::xml(position, e))?;
        Ok(())
    }

    fn attribute(
        &self,
        start: &BytesStart,
        element: &'static str,
        attribute: &'static str,
    ) -> Result<String, LoadError> {
        let position = self.position();
        let attr = start
            .try_get_attribute(attribute)
            .map_err(|e| LoadError::xml(position, e))?
            .ok_or(LoadError::MissingAttribute { element, attribute })?;
        let value = attr
            .unescape_value()
            .map_err(|e| LoadError::xml(position, e))?;
        Ok(value.into_owned())
    }

    fn root_attributes(&self, start: &BytesStart) -> Result<(String, Language), LoadError> {
        let version = self.attribute(start, "TS", "version")?;
        let value = self.attribute(start, "TS", "language")?;
        let language =
            Language::from_code(&value).map_err(|_| LoadError::InvalidLanguage { value })?;
        Ok((version, language))
    }

    /// Read the text content of the element just opened, up to its end tag.
    fn text(&mut self, tag: &str) -> Result<String, LoadError> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    let position = self.position();
                    let text = t.unescape().map_err(|e| LoadError::xml(position, e))?;
                    out.push_str(&text);
                }
                Event::CData(c) => {
                    let position = self.position();
                    let text =
                        std::str::from_utf8(&c).map_err(|e| LoadError::xml(position, e))?;
                    out.push_str(text);
                }
                Event::Start(e) | Event::Empty(e) => return Err(unexpected(&e, tag)),
                Event::End(_) => return Ok(out),
                Event::Eof => {
                    return Err(LoadError::UnexpectedEof {
                        inside: tag.to_string(),
                    })
                }
                _ => {}
            }
        }
    }

    /// Read the contexts of the `TS` element just opened.
    fn contexts(&mut self) -> Result<Vec<Context>, LoadError> {
        let mut contexts = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"context" => {
                    let context = self.context(contexts.len())?;
                    contexts.push(context);
                }
                Event::Empty(e) if e.name().as_ref() == b"context" => {
                    return Err(LoadError::MissingContextName {
                        index: contexts.len(),
                    })
                }
                Event::Start(e) => self.skip(&e)?,
                Event::Text(t) => self.ignore_whitespace(&t, "TS")?,
                Event::End(_) => return Ok(contexts),
                Event::Eof => {
                    return Err(LoadError::UnexpectedEof {
                        inside: "TS".to_string(),
                    })
                }
                _ => {}
            }
        }
    }

    fn context(&mut self, index: usize) -> Result<Context, LoadError> {
        let mut name: Option<String> = None;
        let mut entries = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"name" => {
                    if name.is_some() {
                        return Err(unexpected(&e, "context"));
                    }
                    name = Some(self.text("name")?);
                }
                Event::Empty(e) if e.name().as_ref() == b"name" => {
                    if name.is_some() {
                        return Err(unexpected(&e, "context"));
                    }
                    name = Some(String::new());
                }
                Event::Start(e) if e.name().as_ref() == b"message" => {
                    let context = name.as_deref().unwrap_or_default().to_string();
                    entries.push(self.message(&e, context, false)?);
                }
                Event::Empty(e) if e.name().as_ref() == b"message" => {
                    let context = name.as_deref().unwrap_or_default().to_string();
                    entries.push(self.message(&e, context, true)?);
                }
                Event::Start(e) => self.skip(&e)?,
                Event::Text(t) => self.ignore_whitespace(&t, "context")?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(LoadError::UnexpectedEof {
                        inside: "context".to_string(),
                    })
                }
                _ => {}
            }
        }

        let name = name.ok_or(LoadError::MissingContextName { index })?;
        Ok(Context { name, entries })
    }

    fn message(
        &mut self,
        start: &BytesStart,
        context: String,
        empty: bool,
    ) -> Result<Entry, LoadError> {
        let id = self.attribute(start, "message", "id")?;
        let mut source: Option<String> = None;
        let mut translation: Option<String> = None;

        while !empty {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"source" => {
                    if source.is_some() {
                        return Err(unexpected(&e, "message"));
                    }
                    source = Some(self.text("source")?);
                }
                Event::Empty(e) if e.name().as_ref() == b"source" => {
                    if source.is_some() {
                        return Err(unexpected(&e, "message"));
                    }
                    source = Some(String::new());
                }
                Event::Start(e) if e.name().as_ref() == b"translation" => {
                    if translation.is_some() {
                        return Err(unexpected(&e, "message"));
                    }
                    translation = Some(self.text("translation")?);
                }
                Event::Empty(e) if e.name().as_ref() == b"translation" => {
                    if translation.is_some() {
                        return Err(unexpected(&e, "message"));
                    }
                    translation = Some(String::new());
                }
                Event::Start(e) => self.skip(&e)?,
                Event::Text(t) => self.ignore_whitespace(&t, "message")?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(LoadError::UnexpectedEof {
                        inside: "message".to_string(),
                    })
                }
                _ => {}
            }
        }

        let source = source.ok_or_else(|| LoadError::MissingSource {
            id: id.clone(),
            context,
        })?;
        Ok(Entry {
            id,
            source,
            translation,
        })
    }
}
