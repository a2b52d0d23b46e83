use crate::error::PassageError;
use crate::passage::{Passage, PassageSource};

/// (category, title, content)
const PASSAGES: &[(&str, &str, &str)] = &[
    // General practice
    (
        "general",
        "The Quick Fox",
        concat!(
            "The quick brown fox jumps over the lazy dog and then runs across the field ",
            "while the sun sets behind the distant hills. A farmer watches from the gate, ",
            "leaning on a wooden post that his grandfather set in the ground many years ",
            "ago. When the light has gone, the fox returns to the edge of the wood, where ",
            "the grass is long and the air is cool and still. The dog sleeps on, dreaming ",
            "of the chase it never quite manages to win.",
        ),
    ),
    (
        "general",
        "A Tale of Two Cities",
        concat!(
            "It was the best of times, it was the worst of times, it was the age of ",
            "wisdom, it was the age of foolishness, it was the epoch of belief, it was ",
            "the epoch of incredulity, it was the season of Light, it was the season of ",
            "Darkness, it was the spring of hope, it was the winter of despair, we had ",
            "everything before us, we had nothing before us, we were all going direct to ",
            "Heaven, we were all going direct the other way; in short, the period was so ",
            "far like the present period.",
        ),
    ),
    (
        "general",
        "Walden",
        concat!(
            "I went to the woods because I wished to live deliberately, to front only the ",
            "essential facts of life, and see if I could not learn what it had to teach, ",
            "and not, when I came to die, discover that I had not lived. I did not wish ",
            "to live what was not life, living is so dear; nor did I wish to practise ",
            "resignation, unless it was quite necessary. I wanted to live deep and suck ",
            "out all the marrow of life, to live so sturdily as to put to rout all that ",
            "was not life.",
        ),
    ),
    (
        "general",
        "Pride and Prejudice",
        concat!(
            "It is a truth universally acknowledged, that a single man in possession of a ",
            "good fortune, must be in want of a wife. However little known the feelings ",
            "or views of such a man may be on his first entering a neighbourhood, this ",
            "truth is so well fixed in the minds of the surrounding families, that he is ",
            "considered as the rightful property of some one or other of their daughters. ",
            "My dear Mr. Bennet, said his lady to him one day, have you heard that ",
            "Netherfield Park is let at last?",
        ),
    ),
    (
        "general",
        "Alice",
        concat!(
            "\u{201C}Who in the world am I? Ah, that\u{2019}s the great puzzle!\u{201D} ",
            "she said, as she looked around the strange room with wonder. The hall was ",
            "long and low, lit up by a row of lamps hanging from the roof, and there were ",
            "doors all round it, but they were all locked. When she had been all the way ",
            "down one side and up the other, trying every door, she walked sadly down the ",
            "middle, wondering how she was ever to get out again, until she came upon a ",
            "little table made of solid glass.",
        ),
    ),
    (
        "general",
        "Small Steps",
        concat!(
            "A journey of a thousand miles begins with a single step, and every great ",
            "achievement started with the decision to try. Practice does not need to be ",
            "long to be useful; ten quiet minutes a day, repeated with care, will carry ",
            "you further than one tired hour each week. Keep your eyes on the text, let ",
            "your fingers rest on the home row, and trust them to find the keys. Speed ",
            "arrives on its own once accuracy has become a habit.",
        ),
    ),
    // Data entry
    (
        "data-entry",
        "Invoice Batch",
        concat!(
            "Invoice 4471 was received on 12/03 from Northside Supplies for 240 units at ",
            "3.75 each; the total due is 900.00 within 30 days. Invoice 4472 from Harbour ",
            "Paper Mills lists 65 reams at 4.20, 12 boxes of envelopes at 9.50 and ",
            "freight of 38.00, for a total of 425.00. Invoice 4473 was returned unpaid ",
            "because the purchase order number 7719 did not match the receiving note. ",
            "Please recheck it against ledger page 18 before the batch is closed on ",
            "Friday.",
        ),
    ),
    (
        "data-entry",
        "Customer Record",
        concat!(
            "Name: Priya Raman, Account: 88213-04, City: Pune, Phone: 020 5551 7730, ",
            "Status: active since 2019 (priority customer). Name: Arjun Mehta, Account: ",
            "88214-11, City: Nagpur, Phone: 0712 555 0194, Status: dormant, last order ",
            "14/08/2022. Name: Fatima Sheikh, Account: 88215-07, City: Bhopal, Phone: ",
            "0755 555 3381, Status: active, credit limit 50,000. Name: Thomas Kurian, ",
            "Account: 88216-02, City: Kochi, Phone: 0484 555 6620, Status: closed at ",
            "customer request.",
        ),
    ),
    (
        "data-entry",
        "Shipment Log",
        concat!(
            "Shipment 12 left the warehouse at 07:45 with 18 cartons, 3 pallets and 2 ",
            "crates; the driver signed the manifest at gate 4. Shipment 13 was delayed ",
            "until 09:10 because carton 7 arrived damaged and had to be repacked, and the ",
            "new weight is 412 kg. Shipment 14 left at 11:30 for the Eastern depot with ",
            "26 cartons and 1 pallet, tracking number KX-55120-B. The evening count ",
            "showed 3 cartons short; the supervisor has raised report 91 and informed the ",
            "transport office.",
        ),
    ),
    // Clerical
    (
        "clerk",
        "Office Circular",
        concat!(
            "All staff are requested to submit their leave applications at least seven ",
            "days in advance, so that the work of the section is not disturbed. ",
            "Applications for casual leave may be given to the section officer directly, ",
            "but earned leave and medical leave must be routed through the establishment ",
            "branch with the necessary certificates attached. Staff proceeding on leave ",
            "shall hand over pending files to the officer nominated in their place, and a ",
            "note of the handover shall be kept in the section register.",
        ),
    ),
    (
        "clerk",
        "Meeting Notice",
        concat!(
            "The monthly review meeting will be held in the conference hall on Friday at ",
            "eleven; the agenda and the minutes of the last meeting are attached. Heads ",
            "of sections are requested to bring the updated position of pending ",
            "references, audit paras and court cases, along with a short note on each. ",
            "Any item for inclusion in the agenda may be sent to the undersigned by ",
            "Wednesday evening. Officers who are unable to attend should depute a senior ",
            "assistant who is familiar with the subjects under discussion.",
        ),
    ),
    (
        "clerk",
        "Public Notice",
        concat!(
            "Applicants are advised that incomplete forms will not be accepted, and the ",
            "last date for receipt of applications shall not be extended. Each form must ",
            "be signed by the applicant and accompanied by attested copies of the ",
            "certificates of age, educational qualification and caste, wherever ",
            "applicable. The fee once paid will not be refunded under any circumstances. ",
            "Candidates are advised to keep a copy of the submitted form and the fee ",
            "receipt for future reference, as these may be asked for at the time of the ",
            "interview.",
        ),
    ),
    // Legal
    (
        "legal",
        "Order",
        concat!(
            "Heard the learned counsel for the petitioner. The respondent, though served, ",
            "has not appeared; the matter is therefore adjourned to the next date. The ",
            "petitioner is directed to file an affidavit of service along with the postal ",
            "acknowledgement within two weeks from today. It is made clear that if the ",
            "respondent fails to appear on the next date, the court shall proceed to hear ",
            "the matter ex parte on the basis of the material on record. Interim order ",
            "granted earlier shall continue till the next date of hearing.",
        ),
    ),
    (
        "legal",
        "Affidavit",
        concat!(
            "I, the deponent above named, do hereby solemnly affirm and state that the ",
            "contents of paragraphs 1 to 6 are true to my knowledge. The contents of ",
            "paragraphs 7 and 8 are based on the records maintained in the ordinary ",
            "course of business, which I believe to be true, and the submissions made in ",
            "paragraph 9 are based on legal advice received, which I believe to be ",
            "correct. No part of this affidavit is false and nothing material has been ",
            "concealed therefrom. Verified at the place and on the date mentioned below.",
        ),
    ),
    (
        "legal",
        "Judgment Extract",
        concat!(
            "In view of the foregoing discussion, the appeal is allowed; the impugned ",
            "order is set aside, and the parties shall bear their own costs. The trial ",
            "court failed to consider the documentary evidence produced by the appellant, ",
            "and its conclusion that the agreement was never acted upon cannot be ",
            "sustained in the face of the receipts marked as Exhibits 4 to 9. The matter ",
            "is remitted to the trial court for fresh decision on the question of damages ",
            "alone, which shall be decided within six months from the date of receipt of ",
            "a copy of this judgment.",
        ),
    ),
];

/// Offline passages bundled with the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPassages;

impl BuiltinPassages {
    pub fn categories() -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for &(category, _, _) in PASSAGES {
            if !out.contains(&category) {
                out.push(category);
            }
        }
        out
    }
}

impl PassageSource for BuiltinPassages {
    fn fetch(&self, category: &str) -> Result<Vec<Passage>, PassageError> {
        let passages: Vec<Passage> = PASSAGES
            .iter()
            .enumerate()
            .filter(|(_, (cat, _, _))| *cat == category)
            .map(|(idx, &(cat, title, content))| {
                Passage::new(&format!("{cat}-{idx}"), title, content)
            })
            .collect();

        if passages.is_empty() {
            Err(PassageError::Unavailable(category.to_string()))
        } else {
            Ok(passages)
        }
    }
}
