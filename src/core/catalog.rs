//! Built-in patch sets for the gestao-inteligente front end.
//!
//! Paths are relative to the project root. Multi-line patterns are written
//! with `\n`; the patcher adapts them to CRLF files.

use crate::domain::model::{FileErrorPolicy, PatchSet, Replacement, Target};
use std::path::PathBuf;

pub const APP_FILE: &str = "App.tsx";
pub const COMPONENTS_DIR: &str = "components";

pub const MATERIAL_HEADER_FILES: [&str; 6] = [
    "TransferReport.tsx",
    "StockControl.tsx",
    "ProductionOrderHistoryModal.tsx",
    "ProductionOrder.tsx",
    "InventoryReport.tsx",
    "ConferenceReport.tsx",
];

pub const MSM_BLUE: &str = "#0F3F5C";
pub const MSM_BLUE_DARK: &str = "#0A2A3D";
pub const MSM_BLUE_LIGHT: &str = "#e6f0f5";
pub const MSM_ORANGE: &str = "#FF8C00";
pub const MSM_ORANGE_LIGHT: &str = "#fff3e6";

pub fn builtin_sets() -> Vec<PatchSet> {
    vec![
        fix_app(),
        fix_production_order(),
        fix_material_headers(),
        update_app(),
        update_colors(),
    ]
}

pub fn find_builtin(name: &str) -> Option<PatchSet> {
    builtin_sets().into_iter().find(|set| set.name == name)
}

fn app_target() -> Vec<Target> {
    vec![Target::File(PathBuf::from(APP_FILE))]
}

/// Conference edit/delete go through the `conference_number` column.
pub fn fix_app() -> PatchSet {
    PatchSet {
        name: "fix-app".to_string(),
        description: "Use column-based update/delete for conferences and report their errors"
            .to_string(),
        targets: app_target(),
        on_error: FileErrorPolicy::Abort,
        replacements: vec![
            Replacement::new(
                "editConference: updateItem → updateItemByColumn",
                "            // Update conference\n            await updateItem<ConferenceData>('conferences', conferenceNumber, updatedData);",
                "            // Update conference using conference_number column\n            await updateItemByColumn<ConferenceData>('conferences', 'conference_number', conferenceNumber, updatedData);",
            ),
            Replacement::new(
                "deleteConference: deleteItem → deleteItemByColumn",
                "            // Delete conference\n            await deleteItem('conferences', conferenceNumber);",
                "            // Delete conference using conference_number column\n            await deleteItemByColumn('conferences', 'conference_number', conferenceNumber);",
            ),
            Replacement::new(
                "editConference: loop deletion → deleteItemByColumn",
                "            // Delete old stock items\n            for (const item of conferenceStockItems) {\n                await deleteItem('stock_items', item.id);\n            }",
                "            // Delete all old stock items associated with this conference directly from DB\n            await deleteItemByColumn('stock_items', 'conference_number', conferenceNumber);",
            ),
            Replacement::new(
                "deleteConference: loop deletion → deleteItemByColumn",
                "            // Delete stock items\n            for (const item of conferenceStockItems) {\n                await deleteItem('stock_items', item.id);\n            }",
                "            // Delete all stock items associated with this conference directly from DB\n            await deleteItemByColumn('stock_items', 'conference_number', conferenceNumber);",
            ),
            Replacement::new(
                "editConference: error details",
                "        } catch (error) {\n            showNotification('Erro ao editar conferência.', 'error');\n        }\n    };\n\n    const deleteConference",
                "        } catch (error: any) {\n            console.error('Error editing conference:', error);\n            showNotification(`Erro ao editar conferência: ${error.message || error}`, 'error');\n        }\n    };\n\n    const deleteConference",
            ),
            Replacement::new(
                "deleteConference: error details",
                "        } catch (error) {\n            showNotification('Erro ao excluir conferência.', 'error');\n        }\n    };\n    const addStockItem",
                "        } catch (error: any) {\n            console.error('Error deleting conference:', error);\n            showNotification(`Erro ao excluir conferência: ${error.message || error}`, 'error');\n        }\n    };\n    const addStockItem",
            ),
        ],
    }
}

pub fn fix_production_order() -> PatchSet {
    PatchSet {
        name: "fix-production-order".to_string(),
        description: "Log the error and order data when addProductionOrder fails".to_string(),
        targets: app_target(),
        on_error: FileErrorPolicy::Abort,
        replacements: vec![Replacement::new(
            "addProductionOrder: error logging",
            "        } catch (error) {\n            showNotification('Erro ao criar ordem de produção.', 'error');\n        }\n    };\n\n    const updateProductionOrder",
            "        } catch (error: any) {\n            console.error('Error creating production order:', error);\n            console.error('Order data:', order);\n            showNotification(`Erro ao criar ordem de produção: ${error.message || error}`, 'error');\n        }\n    };\n\n    const updateProductionOrder",
        )],
    }
}

/// Only table headers are touched; body cells keep "Material".
pub fn fix_material_headers() -> PatchSet {
    PatchSet {
        name: "fix-material-headers".to_string(),
        description: "Rename the 'Material' table header to 'Tipo de Material'".to_string(),
        targets: MATERIAL_HEADER_FILES
            .iter()
            .map(|file| Target::File(PathBuf::from(COMPONENTS_DIR).join(file)))
            .collect(),
        on_error: FileErrorPolicy::Skip,
        replacements: vec![Replacement::new(
            "header: Material → Tipo de Material",
            ">Material</th>",
            ">Tipo de Material</th>",
        )],
    }
}

const ADD_LOT_HEAD: &str = r#"
    const addLotToProductionOrder = async (orderId: string, lotId: string) => {
        try {
            const order = productionOrders.find(o => o.id === orderId);
            if (!order) return;

            const stockItem = stock.find(s => s.id === lotId);
            if (!stockItem) return;

            // Update stock item
            await updateItem<StockItem>('stock_items', lotId, {
                status: 'Em Produção - Trefila',
                productionOrderIds: [...(stockItem.productionOrderIds || []), orderId]
            });

            // Update production order
            const currentLots = Array.isArray(order.selectedLotIds) ? order.selectedLotIds : [];
            const newLots = [...currentLots, lotId];
            const newTotalWeight = order.totalWeight + stockItem.remainingQuantity;

            await updateItem('production_orders', orderId, {
                selectedLotIds: newLots,
                totalWeight: newTotalWeight
            });

            // Update local state
            const updatedStock = await fetchTable<StockItem>('stock_items');
            setStock(updatedStock);
"#;

// The blank line inside the function keeps its indentation.
const ADD_LOT_INDENTED_BLANK: &str = "            \n";

const ADD_LOT_TAIL: &str = r#"            setProductionOrders(prev => prev.map(o => {
                if (o.id === orderId) {
                    return {
                        ...o,
                        selectedLotIds: newLots,
                        totalWeight: newTotalWeight
                    };
                }
                return o;
            }));

            showNotification('Lote adicionado à ordem de produção!', 'success');
        } catch (error) {
            showNotification('Erro ao adicionar lote à ordem.', 'error');
        }
    };
"#;

fn add_lot_function() -> String {
    [ADD_LOT_HEAD, ADD_LOT_INDENTED_BLANK, ADD_LOT_TAIL].concat()
}

const RENDER_PAGE_ANCHOR: &str = "const renderPage = () => {";

/// Injects `addLotToProductionOrder` and passes it to the machine control view.
///
/// The injected text ends with the anchor it replaces, so running this set
/// twice injects the function twice.
pub fn update_app() -> PatchSet {
    PatchSet {
        name: "update-app".to_string(),
        description: "Add addLotToProductionOrder and expose it through machineControlProps"
            .to_string(),
        targets: app_target(),
        on_error: FileErrorPolicy::Abort,
        replacements: vec![
            Replacement::anchored(
                "renderPage",
                RENDER_PAGE_ANCHOR,
                [add_lot_function().as_str(), "\n    ", RENDER_PAGE_ANCHOR].concat(),
            ),
            Replacement::anchored(
                "machineControlProps end",
                "            updateProducedQuantity, messages, addMessage\n        };",
                "            updateProducedQuantity, messages, addMessage, addLotToProductionOrder\n        };",
            ),
        ],
    }
}

/// The MSM palette, in application order.
///
/// Shorter class names come before longer ones sharing their prefix
/// (`bg-blue-50` before `bg-blue-500`), so the longer ones are partly
/// rewritten by the earlier entry.
pub fn msm_color_map() -> Vec<(String, String)> {
    let blue_bg = format!("bg-[{}]", MSM_BLUE);
    let blue_text = format!("text-[{}]", MSM_BLUE);
    let orange_text = format!("text-[{}]", MSM_ORANGE);

    vec![
        // indigo → MSM blue
        ("bg-indigo-600".into(), blue_bg.clone()),
        ("bg-indigo-700".into(), format!("bg-[{}]", MSM_BLUE_DARK)),
        ("bg-indigo-50".into(), format!("bg-[{}]", MSM_BLUE_LIGHT)),
        ("text-indigo-600".into(), blue_text.clone()),
        ("text-indigo-700".into(), format!("text-[{}]", MSM_BLUE_DARK)),
        ("text-indigo-900".into(), blue_text.clone()),
        ("border-indigo-200".into(), format!("border-[{}]/20", MSM_BLUE)),
        ("hover:bg-indigo-700".into(), format!("hover:bg-[{}]", MSM_BLUE_DARK)),
        ("hover:bg-indigo-50".into(), format!("hover:bg-[{}]", MSM_BLUE_LIGHT)),
        // purple → MSM orange
        ("bg-purple-50".into(), format!("bg-[{}]", MSM_ORANGE_LIGHT)),
        ("bg-purple-700".into(), orange_text.clone()),
        ("text-purple-700".into(), orange_text),
        ("border-purple-200".into(), format!("border-[{}]/20", MSM_ORANGE)),
        // blue → MSM blue
        ("bg-blue-100".into(), format!("bg-[{}]", MSM_BLUE_LIGHT)),
        ("bg-blue-50".into(), format!("bg-[{}]", MSM_BLUE_LIGHT)),
        ("text-blue-700".into(), blue_text.clone()),
        ("text-blue-800".into(), blue_text.clone()),
        ("border-blue-200".into(), format!("border-[{}]/20", MSM_BLUE)),
        ("bg-blue-500".into(), blue_bg.clone()),
        ("bg-blue-600".into(), blue_bg),
        ("hover:bg-blue-700".into(), format!("hover:bg-[{}]", MSM_BLUE_DARK)),
        // primary → MSM blue
        ("text-primary-600".into(), blue_text),
    ]
}

pub fn update_colors() -> PatchSet {
    PatchSet {
        name: "update-colors".to_string(),
        description: "Replace indigo/purple/blue utility classes with the MSM palette"
            .to_string(),
        targets: vec![Target::Directory {
            dir: PathBuf::from(COMPONENTS_DIR),
            extensions: vec!["tsx".to_string(), "ts".to_string()],
        }],
        on_error: FileErrorPolicy::Skip,
        replacements: msm_color_map()
            .into_iter()
            .map(|(old, new)| Replacement::new(old.clone(), old, new))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patcher::apply_replacements;

    #[test]
    fn test_builtin_names_are_unique() {
        let sets = builtin_sets();
        let mut names: Vec<_> = sets.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), sets.len());
        assert!(find_builtin("update-colors").is_some());
        assert!(find_builtin("nope").is_none());
    }

    #[test]
    fn test_fix_app_replaces_loop_deletion() {
        let before = "            // Delete stock items\n            for (const item of conferenceStockItems) {\n                await deleteItem('stock_items', item.id);\n            }\n";
        let (after, reports) = apply_replacements(before, &fix_app().replacements);

        assert_eq!(
            after,
            "            // Delete all stock items associated with this conference directly from DB\n            await deleteItemByColumn('stock_items', 'conference_number', conferenceNumber);\n"
        );
        assert_eq!(reports.iter().map(|r| r.occurrences).sum::<usize>(), 1);
    }

    #[test]
    fn test_update_app_injects_before_render_page() {
        let before = "    const x = 1;\n    const renderPage = () => {\n        return null;\n    };\n            updateProducedQuantity, messages, addMessage\n        };\n";
        let (after, reports) = apply_replacements(before, &update_app().replacements);

        assert!(reports.iter().all(|r| !r.anchor_missing()));
        let function_at = after.find("const addLotToProductionOrder").unwrap();
        let render_at = after.find(RENDER_PAGE_ANCHOR).unwrap();
        assert!(function_at < render_at);
        assert!(after.contains("messages, addMessage, addLotToProductionOrder\n        };"));
    }

    #[test]
    fn test_injected_function_keeps_indented_blank_line() {
        let function = add_lot_function();
        assert!(function.contains(
            "            setStock(updatedStock);\n            \n            setProductionOrders(prev"
        ));
        assert!(function.starts_with("\n    const addLotToProductionOrder"));
        assert!(function.ends_with("    };\n"));
    }

    #[test]
    fn test_update_app_flags_missing_anchors() {
        let (after, reports) = apply_replacements("const other = 1;\n", &update_app().replacements);
        assert_eq!(after, "const other = 1;\n");
        assert_eq!(reports.iter().filter(|r| r.anchor_missing()).count(), 2);
    }

    #[test]
    fn test_color_map_rewrites_classes() {
        let before = r#"<button className="bg-indigo-600 hover:bg-indigo-700 text-primary-600 border-purple-200">"#;
        let (after, _) = apply_replacements(before, &update_colors().replacements);
        assert_eq!(
            after,
            r#"<button className="bg-[#0F3F5C] hover:bg-[#0A2A3D] text-[#0F3F5C] border-[#FF8C00]/20">"#
        );
    }

    #[test]
    fn test_material_headers_cover_six_components() {
        let set = fix_material_headers();
        assert_eq!(set.targets.len(), 6);
        assert_eq!(set.on_error, FileErrorPolicy::Skip);
        assert!(set
            .targets
            .contains(&Target::File(PathBuf::from("components").join("StockControl.tsx"))));
    }
}
