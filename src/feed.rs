use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/* Shape of the produced document:
<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
<channel>
  <title>Example blog</title>
  <link>https://example.com</link>
  <description>Posts about things</description>
  <lastBuildDate>Thu, 15 Nov 2012 08:00:00 +0000</lastBuildDate>
  <item>
    <title>Hello, world</title>
    <link>https://example.com/2012/11/hello-world</link>
    <guid>https://example.com/2012/11/hello-world</guid>
    <description><![CDATA[<p>Hi</p>]]></description>
    <pubDate>Thu, 15 Nov 2012 00:00:00 +0000</pubDate>
  </item>
</channel>
</rss>
*/

pub struct FeedChannel<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
}

pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
}

impl FeedChannel<'_> {
    pub fn render(
        &self,
        updated: &DateTime<Utc>,
        items: &[FeedItem],
    ) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.title)?;
        push_text(&mut writer, "link", self.link)?;
        push_text(&mut writer, "description", self.description)?;
        push_text(&mut writer, "lastBuildDate", &updated.to_rfc2822())?;

        for item in items {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &item.title)?;
            push_text(&mut writer, "link", &item.link)?;
            // The permalink doubles as the stable identifier
            push_text(&mut writer, "guid", &item.link)?;
            push_cdata(&mut writer, "description", &item.description)?;
            push_text(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
