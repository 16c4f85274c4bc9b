//! Table page: build a small table by hand and export it.

use ml_workbench::CustomTable;
use ml_workbench::table::{CSV_FILE_NAME, XLSX_FILE_NAME};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{dom, sheet};

#[function_component(TablePage)]
pub fn table_page() -> Html {
    let table = use_state(CustomTable::new);
    let column_name = use_state(String::new);

    let on_name_input = {
        let column_name = column_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            column_name.set(input.value());
        })
    };

    let on_add_column = {
        let table = table.clone();
        let column_name = column_name.clone();
        Callback::from(move |_: MouseEvent| {
            let mut new_table = (*table).clone();
            if new_table.add_column(&column_name) {
                table.set(new_table);
                column_name.set(String::new());
            }
        })
    };

    let on_add_row = {
        let table = table.clone();
        Callback::from(move |_: MouseEvent| {
            let mut new_table = (*table).clone();
            new_table.add_row();
            table.set(new_table);
        })
    };

    let on_cell = {
        let table = table.clone();
        Callback::from(move |(row, col, value): (usize, usize, String)| {
            let mut new_table = (*table).clone();
            new_table.set_cell(row, col, &value);
            table.set(new_table);
        })
    };

    let on_save_excel = {
        let table = table.clone();
        Callback::from(move |_: MouseEvent| {
            let saved = table
                .to_grid()
                .map_err(|e| format!("{e}"))
                .and_then(|grid| {
                    sheet::write_workbook(&grid, XLSX_FILE_NAME).map_err(|e| format!("{e:?}"))
                });
            match saved {
                Ok(()) => dom::alert("Table saved successfully as Excel file!"),
                Err(e) => {
                    log::error!("excel export failed: {e}");
                    dom::alert("Error saving table as Excel file");
                }
            }
        })
    };

    let on_save_csv = {
        let table = table.clone();
        Callback::from(move |_: MouseEvent| {
            let saved = table
                .to_csv()
                .map_err(|e| format!("{e}"))
                .and_then(|csv| {
                    dom::download_text(CSV_FILE_NAME, &csv, "text/csv").map_err(|e| format!("{e:?}"))
                });
            if let Err(e) = saved {
                log::error!("csv export failed: {e}");
                dom::alert("Error saving table as CSV file");
            }
        })
    };

    html! {
        <section id="table-section" class="page">
            <h2>{ "Custom Table" }</h2>
            <div class="table-controls">
                <input
                    type="text"
                    placeholder="Column name"
                    value={(*column_name).clone()}
                    oninput={on_name_input}
                />
                <button onclick={on_add_column}>{ "Add Column" }</button>
                <button onclick={on_add_row} disabled={table.columns().is_empty()}>{ "Add Row" }</button>
                <button onclick={on_save_excel}>{ "Save as Excel" }</button>
                <button onclick={on_save_csv}>{ "Save as CSV" }</button>
            </div>
            <table class="custom-table">
                <tr>
                    { for table.columns().iter().map(|c| html! { <th>{ c }</th> }) }
                </tr>
                { for table.rows().iter().enumerate().map(|(r, row)| html! {
                    <tr>
                        { for row.iter().enumerate().map(|(c, cell)| {
                            let on_cell = on_cell.clone();
                            html! {
                                <td>
                                    <input
                                        type="text"
                                        value={cell.clone()}
                                        onchange={Callback::from(move |e: Event| {
                                            let input: HtmlInputElement = e.target_unchecked_into();
                                            on_cell.emit((r, c, input.value()));
                                        })}
                                    />
                                </td>
                            }
                        }) }
                    </tr>
                }) }
            </table>
        </section>
    }
}
