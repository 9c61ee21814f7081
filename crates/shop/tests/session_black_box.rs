use std::io::Cursor;

use bazaar_catalog::{Catalog, ProductId};
use bazaar_shop::{Renderer, Session, SessionState};

const PEN_AND_BOOK: &str = r#"[
    { "id": "1", "name": "Pen", "price": "2.00" },
    { "id": "2", "name": "Book", "price": 10, "stock": 5,
      "kind": { "type": "physical", "weight_grams": 350 } }
]"#;

fn run_script(catalog: Catalog, script: &str) -> (Session, String) {
    let mut session = Session::new(catalog, Renderer::new("$"));
    let mut output = Vec::new();
    session
        .run(Cursor::new(script.to_string()), &mut output)
        .expect("in-memory I/O cannot fail");
    (session, String::from_utf8(output).expect("utf-8 output"))
}

#[test]
fn pen_and_book_totals_follow_every_change() {
    let catalog = Catalog::from_json_str(PEN_AND_BOOK).unwrap();
    let script = "add 1 3\nadd 2 1\ntotal\nedit 1 5\ntotal\nremove 2\ntotal\nexit\n";

    let (session, output) = run_script(catalog, script);

    let totals: Vec<&str> = output
        .lines()
        .filter_map(|l| l.split("Cart total: ").nth(1))
        .collect();
    assert_eq!(totals, vec!["$16.00", "$30.00", "$10.00"]);
    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.journal().len(), 4);
}

#[test]
fn failed_commands_do_not_end_the_session() {
    let catalog = Catalog::from_json_str(PEN_AND_BOOK).unwrap();
    let script = "add 9 1\nadd 1 -2\nadd 2 6\nedit 1 2\nbogus\nadd 1 1\ncart\n";

    let (session, output) = run_script(catalog, script);

    assert!(output.contains("error: product not found: 9"));
    assert!(output.contains("error: invalid quantity"));
    assert!(output.contains("error: insufficient stock for Book: requested 6, available 5"));
    assert!(output.contains("error: cart item not found: 1"));
    assert!(output.contains("error: unknown command 'bogus'"));
    assert!(output.contains("GRAND TOTAL: $2.00"));

    // End of input ends the session without an explicit exit.
    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.cart().len(), 1);
}

#[test]
fn wishlist_is_separate_from_the_cart() {
    let catalog = Catalog::from_json_str(PEN_AND_BOOK).unwrap();
    let script = "wish 2\nwish 2\nwishlist\ntotal\nunwish 2\nwishlist\nquit\n";

    let (session, output) = run_script(catalog, script);

    assert!(output.contains("Book is already on your wishlist."));
    assert!(output.contains("- Book [2] $10.00"));
    assert!(output.contains("Cart total: $0.00"));
    assert!(output.contains("Your wishlist is empty."));
    assert!(session.wishlist().is_empty());
    assert!(session.cart().is_empty());
}

#[test]
fn sample_catalog_session_with_checkout_and_history() {
    let script = "products\nshow 007A\nadd 001A 2\nadd 007A 1\ncheckout\nhistory\n7\n";

    let (session, output) = run_script(Catalog::sample(), script);

    assert!(output.contains("Tata Salt 1kg"));
    assert!(output.contains("Download: https://courses.example.com/hindi-basic"));
    assert!(output.contains("total $855.00."), "{output}");
    assert!(output.contains("ADD 001A x 2"));
    assert!(output.contains("CHECKOUT 3 item(s), $855.00"));
    assert!(session.cart().is_empty());
    assert!(session.cart().quantity_of(&ProductId::new("001A").unwrap()).is_none());
}
