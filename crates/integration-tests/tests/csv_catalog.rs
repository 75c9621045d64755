//! CSV catalog feed: from a published sheet to a browsable catalog.

use almacen_core::catalog::{
    distinct_categories, filter_products, products_from_csv, sort_categories,
};
use almacen_core::ranking::sort_by_rank;
use rust_decimal::Decimal;

const FEED: &str = "\u{feff}Codigo;Nombre;Categoria;SubCategoria;Precio;Orden;Descripcion\n\
P1;Pan integral;Panificados;Panes;\"$ 1.250,00\";2;\"Con masa madre; sin conservantes\"\n\
P2;Miel de campo;Almacen;;800;1;\"Dice \"\"pura\"\" en la etiqueta\"\n\
;;;;;;\n\
P3;Avena arrollada;Almacen;Cereales;\"450,50\";;Suelta, por 500 g\n";

#[test]
fn feed_parses_with_quotes_and_localized_prices() {
    let products = products_from_csv(FEED).expect("feed should parse");
    assert_eq!(products.len(), 3);

    let pan = &products[0];
    assert_eq!(pan.code.as_str(), "P1");
    assert_eq!(pan.price, "1250.00".parse::<Decimal>().expect("decimal"));
    assert_eq!(pan.description, "Con masa madre; sin conservantes");

    // Doubled quotes decode to literal quotes.
    assert_eq!(products[1].description, "Dice \"pura\" en la etiqueta");

    // Surplus unquoted separators fold into the trailing column.
    assert_eq!(products[2].description, "Suelta, por 500 g");
    assert_eq!(products[2].price, "450.50".parse::<Decimal>().expect("decimal"));
}

#[test]
fn feed_products_sort_and_browse_like_the_catalog() {
    let products = products_from_csv(FEED).expect("feed should parse");

    let sorted = sort_by_rank(&products);
    let codes: Vec<&str> = sorted.iter().map(|p| p.code.as_str()).collect();
    // Ranked first (1 then 2), unranked last.
    assert_eq!(codes, ["P2", "P1", "P3"]);

    let categories = sort_categories(
        distinct_categories(&sorted),
        &["Panificados".to_owned()],
    );
    assert_eq!(categories, ["Panificados", "Almacen"]);

    let hits = filter_products(&products, "avena");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code.as_str(), "P3");
}
