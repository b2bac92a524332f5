use std::fs;
use zxml::from_bytes;

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let content = fs::read(&path)?;
        if let Err(err) = from_bytes(&content) {
            return Err(
                std::io::Error::other(format!("Failed to parse valid file {path:?}: {err}")).into(),
            );
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        let content = fs::read(&path)?;
        if from_bytes(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_catalog_fixture_contents() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid/attributes.xml");
    let doc = from_bytes(&fs::read(path)?)?;
    let catalog = doc.tag().get("catalog");
    assert_eq!(catalog.attribute("lang"), Some("en"));

    let books = catalog.get("book");
    assert_eq!(books.count(), 2);
    assert_eq!(books.first().attribute("id"), Some("bk101"));
    assert_eq!(books.last().get("title").value(), Some("Midnight Rain"));
    assert_eq!(books.get(1).get("price").attribute("currency"), Some("EUR"));
    assert_eq!(books.get(1).get("price").value(), Some("5.95"));
    Ok(())
}

#[test]
fn test_markup_fixture_contents() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid/markup.xml");
    let doc = from_bytes(&fs::read(path)?)?;
    let items = doc.tag().get("doc").get("item");
    assert_eq!(items.count(), 2);
    assert_eq!(items.get(0).value(), Some("<b> & \"q\" 'a' \u{a9} \u{263a}"));
    assert_eq!(items.get(1).value(), Some("if (a < b && c > d) { return; }"));
    assert_eq!(doc.tag().get("doc").get("empty").count(), 2);
    Ok(())
}
