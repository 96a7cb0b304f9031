//! Textos de demonstração para a interface web.
//!
//! Frases curtas, no estilo de e-mails e assinaturas corporativas, que
//! exercitam as quatro famílias e alguns casos de borda (prioridade, guarda
//! de `@`, filtro de caixa do LINK, frases de exclusão de datas).

/// Pares `(título, texto)`.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Assinatura",
            "Best regards, John Doe | Sales Director | tel: +44 20 7946 0958 | mobile 415 555 0132 | john.doe@example.com | www.example.com",
        ),
        (
            "Convite",
            "The kickoff meeting is on March 3rd, 2021 at 14:30 gmt in room B. Please confirm by 28/02/2021 via events@company.org",
        ),
        (
            "Fatura",
            "Invoice issued 2023-05-12 , due 12/06/2023 . Questions? call 555-234-5678 or fax: (555) 234-5679 today",
        ),
        (
            "Links",
            "Docs at https://docs.example.org/guide/install.html and the mirror downloads.example.net ; ignore Example.com and ab.co",
        ),
        (
            "Internacional",
            "Tokyo 03-1234-5678 , Moscow +74951234567 , support: help@[192.168.0.1] , Escritório Brasil (11) 98765-4321",
        ),
        (
            "Prioridade",
            "Ref 12 05 2023 was logged by ops@example.org from WWW.STATUS-PAGE.COM",
        ),
    ]
}
