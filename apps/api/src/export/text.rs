//! Plain-text report renderer.
//!
//! Produces the formatted 公估报告 text rendition: letterhead, case header,
//! numbered chapters, signature block. Organization identity in the
//! letterhead uses the same bracket-token convention as the chapter
//! templates, so the caller can substitute real values or leave the tokens
//! for manual completion.

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::export::{DocumentExporter, ExportFormat, ExportedDocument, ReportDraft};

const RULE: &str =
    "═══════════════════════════════════════════════════════════════════";

// 一..十 covers any realistic chapter count; spill over to arabic after.
const CN_ORDINALS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

fn chapter_ordinal(index: usize) -> String {
    CN_ORDINALS
        .get(index)
        .map(|s| (*s).to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}

pub struct PlainTextExporter;

impl PlainTextExporter {
    fn render(&self, draft: &ReportDraft) -> String {
        let date = Utc::now().format("%Y-%m-%d");
        let case_number = draft.case_number.as_deref().unwrap_or("[案件编号]");

        let mut doc = String::new();

        doc.push_str(&format!(
            "\n                        [公估机构名称]\n{RULE}\n\n"
        ));
        doc.push_str("    地址（ADD）：[机构地址]                邮编（POST CODE）：[邮编]\n");
        doc.push_str("    电话（TEL）：[联系电话]                传真（FAX）：[传真号码]\n\n");
        doc.push_str("                          保险公估报告\n\n");
        doc.push_str(&format!("{RULE}\n\n"));
        doc.push_str(&format!("    报告标题：{}\n", draft.title));
        doc.push_str(&format!("    案件编号：{case_number}\n"));
        doc.push_str(&format!("    报告日期：{date}\n\n"));
        doc.push_str(&format!("{RULE}\n\n"));

        for (i, chapter) in draft.chapters.iter().enumerate() {
            doc.push_str(&format!(
                "## {}、{}\n\n{}\n\n",
                chapter_ordinal(i),
                chapter.title,
                chapter.content.trim_end()
            ));
        }

        doc.push_str(&format!("{RULE}\n\n"));
        doc.push_str("                            公估机构信息\n\n");
        doc.push_str("公估机构：[公估机构名称]\n");
        doc.push_str("资质证书：[公估机构资质证书号]\n");
        doc.push_str("联系电话：[联系电话]\n\n");
        doc.push_str("                            公估师签字\n\n");
        doc.push_str("公估师：[公估师姓名]\n");
        doc.push_str("执业证号：[执业证号]\n");
        doc.push_str(&format!("日期：{date}\n"));

        doc
    }
}

#[async_trait]
impl DocumentExporter for PlainTextExporter {
    async fn export(
        &self,
        draft: &ReportDraft,
        format: ExportFormat,
    ) -> Result<ExportedDocument, AppError> {
        let text = self.render(draft);

        // PDF/DOCX binary generation is mocked: the text rendition ships
        // under the target MIME type, marked so nobody mistakes it for a
        // real binary.
        let content = match format {
            ExportFormat::Pdf => format!("PDF模拟内容 - {text}"),
            ExportFormat::Docx | ExportFormat::Txt => text,
        };

        let file_name = format!(
            "公估报告_{}_{}.{}",
            draft.id,
            Utc::now().format("%Y-%m-%d"),
            format.extension()
        );

        Ok(ExportedDocument {
            file_name,
            mime_type: format.mime_type(),
            content: content.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ReportChapter;

    fn draft() -> ReportDraft {
        ReportDraft {
            id: "42".to_string(),
            title: "车辆损失公估报告".to_string(),
            case_number: Some("CASE-42-2024".to_string()),
            chapters: vec![
                ReportChapter {
                    title: "事故经过".to_string(),
                    content: "事故发生于2024年3月15日。".to_string(),
                },
                ReportChapter {
                    title: "公估结论".to_string(),
                    content: "核定损失￥12,000元。".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_txt_export_contains_header_and_chapters() {
        let doc = PlainTextExporter
            .export(&draft(), ExportFormat::Txt)
            .await
            .unwrap();
        let text = String::from_utf8(doc.content).unwrap();
        assert!(text.contains("保险公估报告"));
        assert!(text.contains("案件编号：CASE-42-2024"));
        assert!(text.contains("## 一、事故经过"));
        assert!(text.contains("## 二、公估结论"));
        assert!(doc.file_name.ends_with(".txt"));
    }

    #[tokio::test]
    async fn test_pdf_export_is_marked_as_mock() {
        let doc = PlainTextExporter
            .export(&draft(), ExportFormat::Pdf)
            .await
            .unwrap();
        let text = String::from_utf8(doc.content).unwrap();
        assert!(text.starts_with("PDF模拟内容 - "));
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_missing_case_number_stays_tokenized() {
        let mut d = draft();
        d.case_number = None;
        let doc = PlainTextExporter.export(&d, ExportFormat::Txt).await.unwrap();
        let text = String::from_utf8(doc.content).unwrap();
        assert!(text.contains("案件编号：[案件编号]"));
    }

    #[test]
    fn test_chapter_ordinals_spill_to_arabic() {
        assert_eq!(chapter_ordinal(0), "一");
        assert_eq!(chapter_ordinal(9), "十");
        assert_eq!(chapter_ordinal(10), "11");
    }
}
