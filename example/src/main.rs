// example/src/main.rs

mod generated;

use generated::{registry, Person, PersonPhone};
use pullwire::{Wire, WireError};

fn main() -> Result<(), WireError> {
    let mut person = Person::default();
    person.name = "Ada".to_string();
    person.age = 36;
    person.nicknames = vec!["countess".to_string(), "enchantress".to_string()];
    person.home = PersonPhone {
        id:     1,
        number: "+44 20 7946 0001".to_string(),
    };
    person.book.insert(
        7,
        PersonPhone {
            id:     7,
            number: "+44 20 7946 0107".to_string(),
        },
    );
    person.book.insert(
        2,
        PersonPhone {
            id:     2,
            number: "+44 20 7946 0102".to_string(),
        },
    );

    // The registry singleton parses the embedded schema text on first use and
    // binds every top-level descriptor before returning.
    let bytes = registry().encode("Person", &person)?;
    println!(
        "{} (tag {:#x}) encodes to {} bytes",
        Person::name(),
        Person::tag(),
        bytes.len()
    );

    let mut back = Person::default();
    registry().decode("Person", &mut back, &bytes)?;
    assert_eq!(back, person);
    println!(
        "round-trip ok: {} schema fields, {} book entries",
        Person::descriptor().fields.len(),
        back.book.len()
    );

    back.reset();
    assert_eq!(back, Person::default());
    println!("reset ok");
    Ok(())
}
