/// Harvest log with text, number, date and yes/no columns
pub fn harvest_csv() -> &'static str {
    "Produto,Quantidade,Data,Orgânico\n\
     Alface,150,15/01/2025,sim\n\
     Tomate,200.5,16/01/2025,não\n\
     Cenoura,80,17/01/2025,sim\n"
}

/// Same data with semicolons, decimal points and a byte order mark, as
/// exported by spreadsheet tools in pt-BR locales
pub fn harvest_semicolon_csv() -> Vec<u8> {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(
        "Produto;Quantidade;Data\r\nAlface;150;2025-01-15\r\nTomate;200;2025-01-16\r\n".as_bytes(),
    );
    bytes
}

/// Readings with blank rows, blank cells and an unparseable number
pub fn sparse_readings_csv() -> &'static str {
    "Talhão,Umidade,Observação\n\
     A1,32.5,ok\n\
     ,,\n\
     A2,,seco\n\
     A3,n/d,\n\
     A4,28,\n\
     A5,30,ok\n\
     A6,29.5,\n\
     A7,31,\n"
}

/// Header row only
pub fn headers_only_csv() -> &'static str {
    "Produto,Quantidade\n"
}

/// `rows` numbered rows of a single numeric column
pub fn numbered_csv(rows: usize) -> String {
    let mut csv = String::from("Leitura\n");
    for i in 1..=rows {
        csv.push_str(&format!("{}\n", i));
    }
    csv
}

/// Workbook with the harvest log, a blank row and typed cells
pub fn harvest_xlsx() -> &'static [u8] {
    include_bytes!("../fixtures/colheita.xlsx")
}

/// Harvest log with a blank line, a misspelt quantity and an impossible date.
pub fn harvest_with_bad_values_csv() -> &'static str {
    "Produto,Quantidade,Data\nAlface,150,2025-01-15\n,,\nTomate,abc,2025-02-30\n"
}
