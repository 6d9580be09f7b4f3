//! Assemble a small page and print it

use markup::vocab::{A, HREF};
use markup::{close, AttributeKind, Node, RootRegistry, Schema, SerializerConfig, EMPTY};

const CLASS: AttributeKind = AttributeKind::new("class");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Collaborator vocabulary on top of the built-in one
    let mut schema = Schema::html();
    schema.define("div", [CLASS]).define("a", [CLASS]);

    let home = A.with([HREF.with_value("/")])?;
    let docs = schema.element("a", [HREF.with_value("/docs"), CLASS.with_value("active")])?;

    let page = (EMPTY
        << Node::element("html")
        << Node::element("body")
        << schema.element("div", [CLASS.with_value("nav")])?
        << home
        >> Node::text("Home")
        << close()
        << docs
        >> Node::text("Docs")
        << close()
        << close()
        << Node::element("p")
        >> Node::text("Hello from markup."))?;

    println!("{}", page.render_document()?);
    println!();
    print!("{}", page.root().render_with(&SerializerConfig::pretty())?);

    println!("live roots: {}", RootRegistry::global().len());
    drop(page);
    println!("live roots after drop: {}", RootRegistry::global().len());

    Ok(())
}
